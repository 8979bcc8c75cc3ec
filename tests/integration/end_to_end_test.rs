//! End-to-end: configure, map, format and write a small project

use std::fs;
use std::path::Path;
use tempfile::tempdir;
use pysourcegraph::{
    config::{load_config_with_env_prefix, ConfigBuilder},
    core::TreeBuilder,
    error::Result,
    models::{
        config::{OutputFormat, PartialSettings},
        node::Node,
    },
    output::{create_formatter, create_writer, Formatter, OutputWriter},
};

fn create_shop_project(base_dir: &Path) -> Result<()> {
    fs::write(base_dir.join("__init__.py"), "\"\"\"Shop package.\"\"\"\n")?;

    fs::create_dir_all(base_dir.join("models"))?;
    fs::write(base_dir.join("models/__init__.py"), "")?;
    fs::write(
        base_dir.join("models/product.py"),
        r#""""Product catalogue."""
from dataclasses import dataclass


@dataclass
class Product:
    """A thing for sale."""

    def price_with_tax(self, rate, /, rounding=2, *extra, currency="EUR"):
        """Price including tax."""
        return self.price * (1 + rate)
"#,
    )?;

    fs::write(
        base_dir.join("checkout.py"),
        r#"import json as js
from .models.product import Product
from . import models


async def pay(cart, card, **options):
    '''Charge the card.'''
    def audit(entry):
        pass
    return True
"#,
    )?;

    fs::create_dir_all(base_dir.join("__pycache__"))?;
    fs::write(base_dir.join("__pycache__/checkout.py"), "import stale\n")?;

    fs::write(base_dir.join("legacy.py"), "def legacy(:\n    pass\n")?;

    Ok(())
}

fn find<'a>(node: &'a Node, path: &[&str]) -> &'a Node {
    path.iter().fold(node, |current, name| {
        current
            .find_child(name)
            .unwrap_or_else(|| panic!("no child {} under {}", name, current.name()))
    })
}

#[test]
fn test_map_shop_project() -> Result<()> {
    crate::init_tracing();
    let temp_dir = tempdir()?;
    create_shop_project(temp_dir.path())?;

    let settings = ConfigBuilder::new()
        .merge(PartialSettings {
            scan_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        })
        .build()?;
    let report = TreeBuilder::new(settings)?.build_report()?;
    let tree = report.tree.as_ref().unwrap();

    assert!(tree.find_child("__pycache__").is_none());
    assert!(tree.find_child("legacy").is_none());
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].path.ends_with("legacy.py"));

    let init = find(tree, &["__init__"]);
    assert_eq!(init.docstring(), Some("Shop package."));

    let product = find(tree, &["models", "product"]);
    assert_eq!(product.docstring(), Some("Product catalogue."));
    let names: Vec<&str> = product.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["dataclasses.dataclass", "Product", "price_with_tax"]);
    assert_eq!(product.children()[1].docstring(), Some("A thing for sale."));
    assert_eq!(
        product.children()[2].arguments(),
        Some(&["self".to_string(), "rate".to_string(), "rounding".to_string()][..])
    );

    let checkout = find(tree, &["checkout"]);
    let names: Vec<&str> = checkout.children().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        vec!["json", "models.product.Product", "models", "pay", "audit"]
    );
    assert_eq!(checkout.children()[0].alias(), Some("js"));
    assert_eq!(checkout.children()[3].docstring(), Some("Charge the card."));
    assert_eq!(
        checkout.children()[3].arguments(),
        Some(&["cart".to_string(), "card".to_string()][..])
    );
    Ok(())
}

#[test]
fn test_outputs_for_every_format() -> Result<()> {
    crate::init_tracing();
    let temp_dir = tempdir()?;
    let project = temp_dir.path().join("shop");
    fs::create_dir(&project)?;
    create_shop_project(&project)?;

    let overrides = PartialSettings {
        scan_path: Some(project.clone()),
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(None, overrides, "PSG_E2E_UNSET")?;
    let report = TreeBuilder::new(settings)?.build_report()?;

    for (format, file_name) in [
        (OutputFormat::Text, "tree.txt"),
        (OutputFormat::Json, "tree.json"),
        (OutputFormat::Dot, "tree.dot"),
    ] {
        let output = create_formatter(format, true).format(&report)?;
        let output_path = temp_dir.path().join(file_name);
        create_writer(Some(&output_path)).write(&output)?;

        let written = fs::read_to_string(&output_path)?;
        assert_eq!(written, output);
    }

    let text = fs::read_to_string(temp_dir.path().join("tree.txt"))?;
    assert!(text.contains("import json as js"));
    assert!(text.contains("def price_with_tax(self, rate, rounding)"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("tree.json"))?)?;
    assert_eq!(json["tree"]["name"], "shop");

    let dot = fs::read_to_string(temp_dir.path().join("tree.dot"))?;
    assert!(dot.contains("\"shop.checkout\" -> \"shop.models.product\";"));
    assert!(dot.contains("\"shop.checkout\" -> \"json\";"));
    Ok(())
}
