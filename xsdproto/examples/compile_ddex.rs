//! Compiles the DDEX schema family into proto3 units.
//!
//! Run with: `cargo run --example compile_ddex -- [schema_root] [output_root]`
//!
//! Log output is controlled through `RUST_LOG`, e.g. `RUST_LOG=info`.

use xsdproto::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let schema_root = args.next().unwrap_or_else(|| "xsd".to_string());
    let output_root = args.next().unwrap_or_else(|| "proto".to_string());

    let compiler = Compiler::builder()
        .schema_root(schema_root)
        .output_root(output_root)
        .build();

    for report in compiler.compile_all(&SpecDescriptor::ddex_defaults())? {
        println!(
            "{}: {} unit(s), {} diagnostic(s)",
            report.spec,
            report.outputs.len(),
            report.diagnostics.len()
        );
        for (namespace, path) in &report.outputs {
            println!("  {} -> {}", namespace, path.display());
        }
    }

    Ok(())
}
