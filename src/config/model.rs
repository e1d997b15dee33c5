// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from `Siteflow.toml`.
///
/// ```toml
/// [paths]
/// src = "public/src/"
/// dist = "public/dist/"
/// build = "build/"
///
/// [tools]
/// styles = "npx sass --style=compressed --source-map {src}stylesheets:{dist}stylesheets"
///
/// [server]
/// port = 8080
/// ```
///
/// All sections are optional and default to the layout of the original
/// project.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Source / destination layout from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,

    /// External collaborator commands from `[tools]`.
    #[serde(default)]
    pub tools: ToolsSection,

    /// Development server settings from `[server]`.
    #[serde(default)]
    pub server: ServerSection,
}

/// `[paths]` section.
///
/// Directory roots keep a trailing slash so they can be concatenated with
/// glob suffixes; `validate` normalises them.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Source root containing `stylesheets/`, `scripts/`, `assets/` and
    /// markup files.
    #[serde(default = "default_src")]
    pub src: String,

    /// Distributable root every compiling task writes into.
    #[serde(default = "default_dist")]
    pub dist: String,

    /// Build output directory the packaged files are copied into.
    #[serde(default = "default_build")]
    pub build: String,

    /// Globs, relative to `dist`, selecting the files that make up a
    /// package. Dotfiles need an explicit pattern.
    #[serde(default = "default_package")]
    pub package: Vec<String>,

    /// File name of the compressed package archive, written at the
    /// repository root.
    #[serde(default = "default_archive")]
    pub archive: String,
}

fn default_src() -> String {
    "public/src/".to_string()
}

fn default_dist() -> String {
    "public/dist/".to_string()
}

fn default_build() -> String {
    "build/".to_string()
}

fn default_package() -> Vec<String> {
    vec!["**/*".to_string(), ".htaccess".to_string()]
}

fn default_archive() -> String {
    "build.zip".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            src: default_src(),
            dist: default_dist(),
            build: default_build(),
            package: default_package(),
            archive: default_archive(),
        }
    }
}

/// `[tools]` section: one shell command per external collaborator.
///
/// Commands may use the placeholders `{src}`, `{dist}`, `{build}` and
/// `{mode}` (`production` or `development`). Every collaborator is a black
/// box: siteflow only cares about its exit status.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// Style-sheet compiler (fatal on failure).
    #[serde(default = "default_styles")]
    pub styles: String,

    /// Style linter (findings only, never fatal).
    #[serde(default = "default_styles_lint")]
    pub styles_lint: String,

    /// Script bundler; `{mode}` selects the optimisation profile.
    #[serde(default = "default_scripts")]
    pub scripts: String,

    /// Script linter (findings only).
    #[serde(default = "default_scripts_lint")]
    pub scripts_lint: String,

    /// Markup linter (findings only).
    #[serde(default = "default_markup_lint")]
    pub markup_lint: String,

    /// Image compressor (fatal on failure).
    #[serde(default = "default_assets")]
    pub assets: String,
}

fn default_styles() -> String {
    "npx sass --style=compressed --source-map {src}stylesheets:{dist}stylesheets".to_string()
}

fn default_styles_lint() -> String {
    "npx stylelint \"{src}stylesheets/**/*.scss\"".to_string()
}

fn default_scripts() -> String {
    "npx webpack --mode {mode} --devtool source-map \
     --entry ./{src}scripts/entry.js \
     --output-path {dist}scripts --output-filename bundle.min.js"
        .to_string()
}

fn default_scripts_lint() -> String {
    "npx eslint \"{src}scripts\"".to_string()
}

fn default_markup_lint() -> String {
    "npx htmlhint \"{src}**/*.html\"".to_string()
}

fn default_assets() -> String {
    "npx imagemin \"{src}assets/**/*\" --out-dir={dist}assets".to_string()
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            styles: default_styles(),
            styles_lint: default_styles_lint(),
            scripts: default_scripts(),
            scripts_lint: default_scripts_lint(),
            markup_lint: default_markup_lint(),
            assets: default_assets(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// HTTP port for the static file server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Preferred WebSocket port for the live-reload channel. Falls back to
    /// an ephemeral port when taken.
    #[serde(default = "default_reload_port")]
    pub reload_port: u16,
}

fn default_port() -> u16 {
    8080
}

fn default_reload_port() -> u16 {
    1337
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            reload_port: default_reload_port(),
        }
    }
}
