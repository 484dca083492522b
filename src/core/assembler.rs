use crate::core::models::*;

/// Loader reference the engine resolves to the style extraction plugin's
/// companion loader.
pub const STYLE_EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";

/// Assembles the declarative build record for one mode and project layout.
///
/// Assembly is pure: no filesystem access, no environment reads, no clock.
/// The same mode and layout always produce the same record, which is what
/// makes the output diffable across runs and machines.
pub struct ConfigAssembler {
    mode: BuildMode,
    layout: ProjectLayout,
}

impl ConfigAssembler {
    pub fn new(mode: BuildMode, layout: ProjectLayout) -> Self {
        Self { mode, layout }
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Chunk splitting is always on; minimizers only exist in production.
    pub fn optimization(&self) -> OptimizationSettings {
        let minimizer = if self.mode.is_prod() {
            Some(vec![PluginSpec::CssMinimizer, PluginSpec::ScriptMinifier])
        } else {
            None
        };

        OptimizationSettings {
            split_chunks: SplitChunksSettings {
                chunks: ChunkSplitMode::All,
            },
            minimizer,
        }
    }

    /// Output filename pattern for the given extension. Development keeps
    /// names stable for fast rebuilds; production inserts a content hash
    /// so stale caches never serve an old bundle.
    pub fn filename(&self, ext: &str) -> String {
        if self.mode.is_dev() {
            format!("[name].{}", ext)
        } else {
            format!("[name].[hash].{}", ext)
        }
    }

    /// Loader chain for stylesheets: extraction first, then css-loader,
    /// then an optional preprocessor. The engine applies chains right to
    /// left, so the preprocessor runs before extraction.
    pub fn style_loaders(&self, preprocessor: Option<&str>) -> Vec<LoaderSpec> {
        let mut chain = vec![
            LoaderSpec::with_options(
                STYLE_EXTRACT_LOADER,
                LoaderOptions::CssExtract(CssExtractLoaderOptions {
                    hmr: self.mode.is_dev(),
                    reload_all: true,
                }),
            ),
            LoaderSpec::named("css-loader"),
        ];
        if let Some(loader) = preprocessor {
            chain.push(LoaderSpec::named(loader));
        }
        chain
    }

    /// Transpiler options: the env preset and class properties plugin are
    /// always present, plus one syntax preset when the rule needs it.
    pub fn babel_options(&self, preset: Option<&str>) -> BabelOptions {
        let mut presets = vec!["@babel/preset-env".to_string()];
        if let Some(name) = preset {
            presets.push(name.to_string());
        }
        BabelOptions {
            presets,
            plugins: vec!["@babel/plugin-proposal-class-properties".to_string()],
        }
    }

    /// Loader chain for scripts. Development appends the linter so feedback
    /// shows up in the dev loop; production builds stay lint-free.
    pub fn script_loaders(&self, preset: Option<&str>) -> Vec<LoaderSpec> {
        let mut chain = vec![LoaderSpec::with_options(
            "babel-loader",
            LoaderOptions::Babel(self.babel_options(preset)),
        )];
        if self.mode.is_dev() {
            chain.push(LoaderSpec::named("eslint-loader"));
        }
        chain
    }

    /// The full rule matrix, in the order the engine consults it.
    pub fn module_rules(&self) -> Vec<ModuleRule> {
        vec![
            // Stylesheets
            ModuleRule::new(r"\.(css)$", self.style_loaders(None)),
            ModuleRule::new(r"\.(less)$", self.style_loaders(Some("less-loader"))),
            ModuleRule::new(r"\.(sass|scss)$", self.style_loaders(Some("sass-loader"))),
            // Static assets
            ModuleRule::new(
                r"\.(png|jpeg|jpg|svg|gif)$",
                vec![LoaderSpec::named("file-loader")],
            ),
            ModuleRule::new(
                r"\.(ttf|woff|woff2|eot)$",
                vec![LoaderSpec::named("file-loader")],
            ),
            // Data files
            ModuleRule::new(r"\.xml$", vec![LoaderSpec::named("xml-loader")]),
            ModuleRule::new(r"\.csv$", vec![LoaderSpec::named("csv-loader")]),
            // Scripts
            ModuleRule::new(r"\.js$", self.script_loaders(None)).with_exclude("node_modules"),
            ModuleRule::new(
                r"\.ts$",
                vec![LoaderSpec::with_options(
                    "babel-loader",
                    LoaderOptions::Babel(self.babel_options(Some("@babel/preset-typescript"))),
                )],
            )
            .with_exclude("node_modules"),
            ModuleRule::new(
                r"\.jsx$",
                vec![LoaderSpec::with_options(
                    "babel-loader",
                    LoaderOptions::Babel(self.babel_options(Some("@babel/preset-react"))),
                )],
            )
            .with_exclude("node_modules"),
        ]
    }

    /// Plugin roster. HTML minification follows the mode, and the bundle
    /// analyzer only joins production builds.
    pub fn plugins(&self) -> Vec<PluginSpec> {
        let mut plugins = vec![
            PluginSpec::HtmlTemplate(HtmlTemplateOptions {
                template: self.layout.template.clone(),
                minify: HtmlMinifyOptions {
                    collapse_whitespace: self.mode.is_prod(),
                },
            }),
            PluginSpec::CleanOutput,
            PluginSpec::CopyAssets(CopyAssetsOptions {
                patterns: vec![CopyPattern {
                    from: self.layout.favicon_path().to_string_lossy().into_owned(),
                    to: self.layout.assets_out_path().to_string_lossy().into_owned(),
                }],
            }),
            PluginSpec::CssExtract(CssExtractOptions {
                filename: self.filename("css"),
            }),
        ];
        if self.mode.is_prod() {
            plugins.push(PluginSpec::BundleAnalyzer);
        }
        plugins
    }

    /// Puts the whole record together.
    pub fn assemble(&self) -> BuildConfiguration {
        BuildConfiguration {
            context: self.layout.source_path(),
            mode: self.mode,
            entry: self.layout.entry.clone(),
            output: OutputSettings {
                filename: self.filename("js"),
                path: self.layout.out_path(),
            },
            resolve: ResolveSettings {
                extensions: self.layout.extensions.clone(),
                alias: self.layout.alias_paths(),
            },
            optimization: self.optimization(),
            dev_server: DevServerSettings {
                port: self.layout.port,
                hot: self.mode.is_dev(),
            },
            devtool: if self.mode.is_dev() {
                Devtool::SourceMap
            } else {
                Devtool::Disabled
            },
            plugins: self.plugins(),
            module: ModuleSettings {
                rules: self.module_rules(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler(mode: BuildMode) -> ConfigAssembler {
        ConfigAssembler::new(mode, ProjectLayout::for_root("/work/app"))
    }

    #[test]
    fn test_development_optimization_has_no_minimizer() {
        let opt = assembler(BuildMode::Development).optimization();
        assert_eq!(opt.split_chunks.chunks, ChunkSplitMode::All);
        assert!(opt.minimizer.is_none());
    }

    #[test]
    fn test_production_optimization_lists_minimizers_in_order() {
        let opt = assembler(BuildMode::Production).optimization();
        assert_eq!(opt.split_chunks.chunks, ChunkSplitMode::All);
        let minimizer = opt.minimizer.expect("production carries minimizers");
        assert_eq!(
            minimizer,
            vec![PluginSpec::CssMinimizer, PluginSpec::ScriptMinifier]
        );
    }

    #[test]
    fn test_filename_pattern_tracks_mode() {
        assert_eq!(assembler(BuildMode::Development).filename("js"), "[name].js");
        assert_eq!(
            assembler(BuildMode::Production).filename("js"),
            "[name].[hash].js"
        );
        assert_eq!(
            assembler(BuildMode::Production).filename("css"),
            "[name].[hash].css"
        );
    }

    #[test]
    fn test_style_loaders_order_and_hmr() {
        let dev = assembler(BuildMode::Development).style_loaders(Some("sass-loader"));
        assert_eq!(dev.len(), 3);
        assert_eq!(dev[0].loader_name(), STYLE_EXTRACT_LOADER);
        match &dev[0] {
            LoaderSpec::WithOptions {
                options: LoaderOptions::CssExtract(opts),
                ..
            } => {
                assert!(opts.hmr);
                assert!(opts.reload_all);
            }
            other => panic!("unexpected extract loader shape: {:?}", other),
        }
        assert_eq!(dev[1].loader_name(), "css-loader");
        assert_eq!(dev[2].loader_name(), "sass-loader");

        let prod = assembler(BuildMode::Production).style_loaders(None);
        assert_eq!(prod.len(), 2);
        match &prod[0] {
            LoaderSpec::WithOptions {
                options: LoaderOptions::CssExtract(opts),
                ..
            } => {
                assert!(!opts.hmr);
                assert!(opts.reload_all);
            }
            other => panic!("unexpected extract loader shape: {:?}", other),
        }
    }

    #[test]
    fn test_babel_options_base_and_extra_preset() {
        let base = assembler(BuildMode::Production).babel_options(None);
        assert_eq!(base.presets, vec!["@babel/preset-env"]);
        assert_eq!(
            base.plugins,
            vec!["@babel/plugin-proposal-class-properties"]
        );

        let ts = assembler(BuildMode::Production).babel_options(Some("@babel/preset-typescript"));
        assert_eq!(
            ts.presets,
            vec!["@babel/preset-env", "@babel/preset-typescript"]
        );
    }

    #[test]
    fn test_script_loaders_append_linter_in_development() {
        let dev = assembler(BuildMode::Development).script_loaders(None);
        assert_eq!(dev.len(), 2);
        assert_eq!(dev[0].loader_name(), "babel-loader");
        assert_eq!(dev[1].loader_name(), "eslint-loader");

        let prod = assembler(BuildMode::Production).script_loaders(None);
        assert_eq!(prod.len(), 1);
        assert_eq!(prod[0].loader_name(), "babel-loader");
    }

    #[test]
    fn test_rule_matrix_covers_all_module_kinds() {
        let rules = assembler(BuildMode::Development).module_rules();
        assert_eq!(rules.len(), 10);

        let tests: Vec<&str> = rules.iter().map(|r| r.test.as_str()).collect();
        assert_eq!(
            tests,
            vec![
                r"\.(css)$",
                r"\.(less)$",
                r"\.(sass|scss)$",
                r"\.(png|jpeg|jpg|svg|gif)$",
                r"\.(ttf|woff|woff2|eot)$",
                r"\.xml$",
                r"\.csv$",
                r"\.js$",
                r"\.ts$",
                r"\.jsx$",
            ]
        );

        for rule in &rules {
            let scripted = [r"\.js$", r"\.ts$", r"\.jsx$"].contains(&rule.test.as_str());
            assert_eq!(rule.exclude.is_some(), scripted, "exclude on {}", rule.test);
        }
    }

    #[test]
    fn test_style_chain_declared_and_application_order() {
        let rules = assembler(BuildMode::Development).module_rules();
        let hits = matching_rules(&rules, "src/styles/main.scss");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].loader_names(),
            vec![STYLE_EXTRACT_LOADER, "css-loader", "sass-loader"]
        );
        assert_eq!(
            hits[0].application_order(),
            vec!["sass-loader", "css-loader", STYLE_EXTRACT_LOADER]
        );
    }

    #[test]
    fn test_typescript_and_jsx_rules_skip_the_linter() {
        // Only the plain .js rule carries eslint; the syntax-preset rules
        // stay single-loader even in development.
        let rules = assembler(BuildMode::Development).module_rules();
        let ts = rules.iter().find(|r| r.test == r"\.ts$").unwrap();
        let jsx = rules.iter().find(|r| r.test == r"\.jsx$").unwrap();
        assert_eq!(ts.use_chain.len(), 1);
        assert_eq!(jsx.use_chain.len(), 1);

        match &ts.use_chain[0] {
            LoaderSpec::WithOptions {
                options: LoaderOptions::Babel(opts),
                ..
            } => assert!(opts.presets.contains(&"@babel/preset-typescript".to_string())),
            other => panic!("unexpected ts loader: {:?}", other),
        }
        match &jsx.use_chain[0] {
            LoaderSpec::WithOptions {
                options: LoaderOptions::Babel(opts),
                ..
            } => assert!(opts.presets.contains(&"@babel/preset-react".to_string())),
            other => panic!("unexpected jsx loader: {:?}", other),
        }
    }

    #[test]
    fn test_plugin_roster_per_mode() {
        let dev = assembler(BuildMode::Development).plugins();
        let names: Vec<&str> = dev.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "HtmlWebpackPlugin",
                "CleanWebpackPlugin",
                "CopyWebpackPlugin",
                "MiniCssExtractPlugin",
            ]
        );

        let prod = assembler(BuildMode::Production).plugins();
        assert_eq!(prod.len(), 5);
        assert_eq!(prod.last().unwrap().name(), "BundleAnalyzerPlugin");
    }

    #[test]
    fn test_html_minification_follows_mode() {
        let collapse = |mode: BuildMode| -> bool {
            match &assembler(mode).plugins()[0] {
                PluginSpec::HtmlTemplate(opts) => opts.minify.collapse_whitespace,
                other => panic!("first plugin should be the page plugin: {:?}", other),
            }
        };
        assert!(!collapse(BuildMode::Development));
        assert!(collapse(BuildMode::Production));
    }

    #[test]
    fn test_css_extract_filename_tracks_mode() {
        let extract_filename = |mode: BuildMode| -> String {
            assembler(mode)
                .plugins()
                .iter()
                .find_map(|p| match p {
                    PluginSpec::CssExtract(opts) => Some(opts.filename.clone()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(extract_filename(BuildMode::Development), "[name].css");
        assert_eq!(extract_filename(BuildMode::Production), "[name].[hash].css");
    }

    #[test]
    fn test_favicon_copy_targets_output_assets() {
        let plugins = assembler(BuildMode::Development).plugins();
        let copy = plugins
            .iter()
            .find_map(|p| match p {
                PluginSpec::CopyAssets(opts) => Some(opts),
                _ => None,
            })
            .unwrap();
        assert_eq!(copy.patterns.len(), 1);
        assert_eq!(copy.patterns[0].from, "/work/app/src/assets/favicon.ico");
        assert_eq!(copy.patterns[0].to, "/work/app/dist/assets");
    }

    #[test]
    fn test_assemble_development_record() {
        let record = assembler(BuildMode::Development).assemble();
        assert_eq!(record.mode, BuildMode::Development);
        assert_eq!(record.context, std::path::PathBuf::from("/work/app/src"));
        assert_eq!(record.output.filename, "[name].js");
        assert_eq!(record.devtool, Devtool::SourceMap);
        assert!(record.dev_server.hot);
        assert_eq!(record.dev_server.port, 3000);
        assert!(record.entry.contains_key("main"));
        assert!(record.entry.contains_key("analytics"));
        assert_eq!(
            record.resolve.extensions,
            vec![".js", ".json", ".jsx"]
        );
    }

    #[test]
    fn test_assemble_production_record() {
        let record = assembler(BuildMode::Production).assemble();
        assert_eq!(record.output.filename, "[name].[hash].js");
        assert_eq!(record.devtool, Devtool::Disabled);
        assert!(!record.dev_server.hot);
        assert!(record.optimization.minimizer.is_some());
        assert_eq!(record.plugins.len(), 5);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let a = assembler(BuildMode::Production).assemble();
        let b = assembler(BuildMode::Production).assemble();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
