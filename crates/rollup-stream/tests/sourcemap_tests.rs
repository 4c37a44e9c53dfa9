//! Inline source-map annotation, end to end through the stream.

mod helpers;

use async_trait::async_trait;
use helpers::VirtualModules;
use rollup_stream::{
    BundleHandle, Bundler, ConfigSnapshot, GeneratedBundle, InputOptions, Result, SourceMap,
    rollup,
};

#[tokio::test]
async fn added_when_source_map_is_requested() {
    let code = rollup(
        InputOptions::new("./entry.js")
            .source_map(true)
            .plugin(VirtualModules::new([(
                "./entry.js",
                "console.log('Hello, World!');",
            )])),
    )
    .into_string()
    .await
    .unwrap();

    assert!(code.contains("\n//# sourceMappingURL=data:application/json;"));
    assert!(code.starts_with("console.log('Hello, World!');"));
}

#[tokio::test]
async fn not_added_otherwise() {
    let code = rollup(InputOptions::new("./entry.js").plugin(VirtualModules::new([(
        "./entry.js",
        "console.log('Hello, World!');",
    )])))
    .into_string()
    .await
    .unwrap();

    assert!(!code.contains("//# sourceMappingURL="));
}

struct MappedBundler;

#[async_trait]
impl Bundler for MappedBundler {
    async fn build(&self, _options: &ConfigSnapshot) -> Result<Box<dyn BundleHandle>> {
        Ok(Box::new(MappedBundler))
    }
}

#[async_trait]
impl BundleHandle for MappedBundler {
    async fn generate(&self, _options: &ConfigSnapshot) -> Result<GeneratedBundle> {
        let mut map = SourceMap::new();
        map.sources = vec!["./entry.js".to_string()];
        map.mappings = "AAAA".to_string();
        Ok(GeneratedBundle {
            code: "var a = 1;".to_string(),
            map: Some(map),
        })
    }
}

#[tokio::test]
async fn annotates_an_injected_backend_map() {
    let code = rollup(InputOptions::new("./entry.js").source_map(true).bundler(MappedBundler))
        .into_string()
        .await
        .unwrap();

    assert!(code.starts_with("var a = 1;\n//# sourceMappingURL="));
    assert!(code.contains("data:application/json;charset=utf-8;base64,"));
}

#[tokio::test]
async fn backend_map_is_dropped_when_not_requested() {
    let code = rollup(InputOptions::new("./entry.js").bundler(MappedBundler))
        .into_string()
        .await
        .unwrap();

    assert_eq!(code, "var a = 1;");
}
