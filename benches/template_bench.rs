//! Quick benchmark to verify template resolution performance

use replacer::{ReplacementMap, Replacer, ReplacerConfig};
use std::time::Instant;

fn main() {
    let vars = ReplacementMap::new()
        .with_literal("name", "ada lovelace")
        .with_literal("price", "1234567.891")
        .with_literal("born", "1815-12-10")
        .with_producer("join", |args| args.map(|a| a.join("+")).unwrap_or_default());

    // Test templates of varying complexity
    let templates = vec![
        "Simple text with no templates",
        "Hello {{name}}",
        "Multiple {{name}} and {{price}} references",
        "Processed: {{name|capitalize}} {{price|number:2}} {{born|date:%d.%m.%Y}}",
        "{{join:a,b,c}} {{price|currency:de_DE,EUR}} {{missing|upper}} {{name|upper}} mixed content",
    ];

    println!("Template Resolution Performance Test");
    println!("====================================\n");

    for (label, config) in [
        ("cache on", ReplacerConfig::default()),
        ("cache off", {
            let mut c = ReplacerConfig::default();
            c.cache.enabled = false;
            c
        }),
    ] {
        let engine = Replacer::with_config(&config);
        println!("--- {label} ---\n");

        for template in &templates {
            let iterations = 100_000;
            let start = Instant::now();

            for _ in 0..iterations {
                let _ = engine.replace(template, &vars);
            }

            let elapsed = start.elapsed();
            let per_op = elapsed / iterations;

            println!("Template: {:60}", format!("\"{}\"", template));
            println!("  Time for {} iterations: {:?}", iterations, elapsed);
            println!("  Per operation: {:?}\n", per_op);
        }
    }
}
