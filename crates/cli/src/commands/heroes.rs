use lucky_core::{Catalog, Role};

use crate::render;
use crate::{fail, GlobalOptions, OutputFormat};

pub(crate) fn cmd_heroes(role: Option<&str>, search: &str, opts: &GlobalOptions) {
    let role = match role.map(str::parse::<Role>).transpose() {
        Ok(r) => r,
        Err(e) => fail(&format!("error: {}", e), opts),
    };
    let catalog = Catalog::builtin();
    let heroes: Vec<_> = catalog.browse(role, search).collect();

    match opts.output {
        OutputFormat::Text => {
            if heroes.is_empty() {
                println!("No heroes match.");
            }
            for hero in &heroes {
                println!("{}", render::hero_line(hero, false));
            }
        }
        OutputFormat::Json => {
            let list: Vec<_> = heroes.iter().map(|h| render::hero_json(h)).collect();
            let json =
                serde_json::to_string_pretty(&list).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

pub(crate) fn cmd_roles(opts: &GlobalOptions) {
    let catalog = Catalog::builtin();
    match opts.output {
        OutputFormat::Text => {
            for line in render::roles_lines(catalog, None) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&render::roles_json(catalog))
                .unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}
