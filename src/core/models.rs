use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Build mode driving every mode-dependent decision in the assembled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Recognizes the two canonical mode spellings. Anything else is None,
    /// which callers treat as development.
    pub fn recognize(value: &str) -> Option<Self> {
        match value {
            "development" => Some(BuildMode::Development),
            "production" => Some(BuildMode::Production),
            _ => None,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, BuildMode::Development)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, BuildMode::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        BuildMode::Development
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a project keeps its sources and where the bundle should land.
/// Everything here has a default matching the conventional layout, so a
/// bare root is enough to assemble a full record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    /// Directory holding the application sources, relative to the root.
    pub source_dir: String,
    /// Directory the bundle is written to, relative to the root.
    pub out_dir: String,
    /// HTML template handed to the page plugin, relative to the source dir.
    pub template: String,
    /// Favicon to copy into the output, relative to the source dir.
    pub favicon: String,
    pub port: u16,
    pub entry: BTreeMap<String, EntrySpec>,
    /// Import alias -> directory relative to the root.
    pub alias: BTreeMap<String, String>,
    pub extensions: Vec<String>,
}

impl ProjectLayout {
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let mut entry = BTreeMap::new();
        entry.insert(
            "main".to_string(),
            EntrySpec::Modules(vec![
                "@babel/polyfill".to_string(),
                "./index.jsx".to_string(),
            ]),
        );
        entry.insert(
            "analytics".to_string(),
            EntrySpec::Module("./analytics.ts".to_string()),
        );

        Self {
            root: root.into(),
            source_dir: "src".to_string(),
            out_dir: "dist".to_string(),
            template: "./index.html".to_string(),
            favicon: "assets/favicon.ico".to_string(),
            port: 3000,
            entry,
            alias: Self::default_aliases("src"),
            extensions: vec![".js".to_string(), ".json".to_string(), ".jsx".to_string()],
        }
    }

    /// Conventional aliases derived from the source dir, so "@/foo" and
    /// "@components/Bar" resolve without relative-path ladders.
    pub fn default_aliases(source_dir: &str) -> BTreeMap<String, String> {
        let mut alias = BTreeMap::new();
        alias.insert("@".to_string(), source_dir.to_string());
        alias.insert(
            "@components".to_string(),
            format!("{}/components", source_dir),
        );
        alias
    }

    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    pub fn out_path(&self) -> PathBuf {
        self.root.join(&self.out_dir)
    }

    pub fn favicon_path(&self) -> PathBuf {
        self.source_path().join(&self.favicon)
    }

    pub fn assets_out_path(&self) -> PathBuf {
        self.out_path().join("assets")
    }

    pub fn alias_paths(&self) -> BTreeMap<String, PathBuf> {
        self.alias
            .iter()
            .map(|(name, dir)| (name.clone(), self.root.join(dir)))
            .collect()
    }
}

/// One entry point: a single module, or an ordered list bundled together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    Module(String),
    Modules(Vec<String>),
}

/// Chunk-splitting strategy for shared dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSplitMode {
    All,
    Async,
    Initial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitChunksSettings {
    pub chunks: ChunkSplitMode,
}

/// Optimization block of the record. The minimizer list is only present in
/// production; in development the key is omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSettings {
    pub split_chunks: SplitChunksSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimizer: Option<Vec<PluginSpec>>,
}

/// A loader reference: bare name, or name plus an options object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoaderSpec {
    Name(String),
    WithOptions {
        loader: String,
        options: LoaderOptions,
    },
}

impl LoaderSpec {
    pub fn named(loader: impl Into<String>) -> Self {
        LoaderSpec::Name(loader.into())
    }

    pub fn with_options(loader: impl Into<String>, options: LoaderOptions) -> Self {
        LoaderSpec::WithOptions {
            loader: loader.into(),
            options,
        }
    }

    pub fn loader_name(&self) -> &str {
        match self {
            LoaderSpec::Name(name) => name,
            LoaderSpec::WithOptions { loader, .. } => loader,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoaderOptions {
    CssExtract(CssExtractLoaderOptions),
    Babel(BabelOptions),
}

/// Options for the style extraction loader. Hot reload only makes sense in
/// development, so `hmr` tracks the mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssExtractLoaderOptions {
    pub hmr: bool,
    pub reload_all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabelOptions {
    pub presets: Vec<String>,
    pub plugins: Vec<String>,
}

/// Maps a filename pattern to the loader chain that processes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRule {
    /// Regular expression matched against the module path.
    pub test: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    #[serde(rename = "use")]
    pub use_chain: Vec<LoaderSpec>,
}

impl ModuleRule {
    pub fn new(test: impl Into<String>, use_chain: Vec<LoaderSpec>) -> Self {
        Self {
            test: test.into(),
            exclude: None,
            use_chain,
        }
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    /// Loader names in declared order.
    pub fn loader_names(&self) -> Vec<&str> {
        self.use_chain.iter().map(|l| l.loader_name()).collect()
    }

    /// Loader names in the order the engine runs them. Chains apply right
    /// to left, so the last declared loader transforms the module first.
    pub fn application_order(&self) -> Vec<&str> {
        let mut names = self.loader_names();
        names.reverse();
        names
    }

    /// Whether this rule applies to the given module path. An invalid
    /// pattern never matches rather than aborting the walk.
    pub fn matches(&self, path: &str) -> bool {
        let hit = regex::Regex::new(&self.test)
            .map(|re| re.is_match(path))
            .unwrap_or(false);
        if !hit {
            return false;
        }
        match &self.exclude {
            Some(pattern) => !regex::Regex::new(pattern)
                .map(|re| re.is_match(path))
                .unwrap_or(false),
            None => true,
        }
    }
}

/// All rules that would process the given path, in declaration order.
pub fn matching_rules<'a>(rules: &'a [ModuleRule], path: &str) -> Vec<&'a ModuleRule> {
    rules.iter().filter(|rule| rule.matches(path)).collect()
}

/// Declarative plugin reference: the engine-side class name plus its options.
/// Serialized as `{"name": "...", "options": {...}}`, with `options` omitted
/// for plugins that take none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "options")]
pub enum PluginSpec {
    #[serde(rename = "HtmlWebpackPlugin")]
    HtmlTemplate(HtmlTemplateOptions),
    #[serde(rename = "CleanWebpackPlugin")]
    CleanOutput,
    #[serde(rename = "CopyWebpackPlugin")]
    CopyAssets(CopyAssetsOptions),
    #[serde(rename = "MiniCssExtractPlugin")]
    CssExtract(CssExtractOptions),
    #[serde(rename = "OptimizeCssAssetsWebpackPlugin")]
    CssMinimizer,
    #[serde(rename = "TerserWebpackPlugin")]
    ScriptMinifier,
    #[serde(rename = "BundleAnalyzerPlugin")]
    BundleAnalyzer,
}

impl PluginSpec {
    pub fn name(&self) -> &'static str {
        match self {
            PluginSpec::HtmlTemplate(_) => "HtmlWebpackPlugin",
            PluginSpec::CleanOutput => "CleanWebpackPlugin",
            PluginSpec::CopyAssets(_) => "CopyWebpackPlugin",
            PluginSpec::CssExtract(_) => "MiniCssExtractPlugin",
            PluginSpec::CssMinimizer => "OptimizeCssAssetsWebpackPlugin",
            PluginSpec::ScriptMinifier => "TerserWebpackPlugin",
            PluginSpec::BundleAnalyzer => "BundleAnalyzerPlugin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlTemplateOptions {
    pub template: String,
    pub minify: HtmlMinifyOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlMinifyOptions {
    pub collapse_whitespace: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyAssetsOptions {
    pub patterns: Vec<CopyPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyPattern {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssExtractOptions {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub filename: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveSettings {
    pub extensions: Vec<String>,
    pub alias: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevServerSettings {
    pub port: u16,
    pub hot: bool,
}

/// Source map strategy. Disabled serializes as the empty string, which the
/// engine reads as "no devtool".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Devtool {
    #[serde(rename = "source-map")]
    SourceMap,
    #[serde(rename = "")]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSettings {
    pub rules: Vec<ModuleRule>,
}

/// The complete assembled record, ready to serialize for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub context: PathBuf,
    pub mode: BuildMode,
    pub entry: BTreeMap<String, EntrySpec>,
    pub output: OutputSettings,
    pub resolve: ResolveSettings,
    pub optimization: OptimizationSettings,
    pub dev_server: DevServerSettings,
    pub devtool: Devtool,
    pub plugins: Vec<PluginSpec>,
    pub module: ModuleSettings,
}
