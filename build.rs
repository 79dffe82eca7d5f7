use std::fs;

const DEFAULT_CONFIG: &str = "src/default_config.toml";

/// Tables `Config` reads from the bundled defaults.
const SECTIONS: [&str; 2] = ["parser", "html"];

fn main() {
    println!("cargo:rerun-if-changed={DEFAULT_CONFIG}");

    let content = fs::read_to_string(DEFAULT_CONFIG)
        .unwrap_or_else(|e| panic!("chatmark: cannot read {DEFAULT_CONFIG}: {e}"));

    // `Config::compiled_default` falls back to code defaults on a bad file,
    // so a broken bundle would otherwise go unnoticed.
    let table: toml::Table = content
        .parse()
        .unwrap_or_else(|e| panic!("chatmark: {DEFAULT_CONFIG} is not valid TOML: {e}"));

    for section in SECTIONS {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("chatmark: {DEFAULT_CONFIG} is missing the [{section}] table");
        }
    }
}
