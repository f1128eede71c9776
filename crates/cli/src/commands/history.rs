use lucky_storage::load_history;

use crate::config::LuckyConfig;
use crate::render;
use crate::session::history_store;
use crate::{fail, GlobalOptions, OutputFormat};

pub(crate) fn cmd_history(limit: Option<usize>, opts: &GlobalOptions) {
    let config = match LuckyConfig::load(opts.config.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(&format!("error: {}", e), opts),
    };
    let data_dir = opts.data_dir.clone().unwrap_or(config.storage.data_dir);
    let history = load_history(&history_store(data_dir));

    let entries = history.entries();
    let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];

    match opts.output {
        OutputFormat::Text => {
            for line in render::history_lines(shown) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(shown).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}
