//! Catalog command: print the registered indices.

use anyhow::Result;

use climdex_indices::{IndexCatalog, IndexCategory, IndexDefinition};

use crate::cli::CatalogArgs;
use crate::config::{self, ClimdexConfig};
use crate::convert;

pub fn run(args: CatalogArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => ClimdexConfig::default(),
    };
    let catalog = convert::build_catalog(&config.units, &config.run)?;
    print!("{}", render(&catalog));
    Ok(())
}

fn kind(def: &IndexDefinition) -> &'static str {
    match def.category() {
        IndexCategory::Annual(_) => "annual",
        IndexCategory::Spell(_) => "spell",
    }
}

/// One line per index: id, variable, kind and description.
fn render(catalog: &IndexCatalog) -> String {
    let mut out = format!("{:<8} {:<8} {:<7} {}\n", "id", "variable", "kind", "description");
    for def in catalog.definitions() {
        out.push_str(&format!(
            "{:<8} {:<8} {:<7} {}\n",
            def.id(),
            def.variable(),
            kind(def),
            def.description()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use climdex_indices::InputUnits;

    #[test]
    fn renders_every_index() {
        let catalog = IndexCatalog::new(InputUnits::default());
        let text = render(&catalog);
        assert_eq!(text.lines().count(), catalog.len() + 1);
        assert!(text.lines().any(|l| l.starts_with("wsdi") && l.contains("spell")));
        assert!(text.lines().any(|l| l.starts_with("rx5day") && l.contains("pr")));
    }
}
