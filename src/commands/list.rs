//! List commands implementation

use crate::backends;

/// List all register backends compiled in
pub fn list_backends() {
    println!("Supported backends:");
    println!();
    for b in backends::available_backends() {
        if b.aliases.is_empty() {
            println!("  {:10} - {}", b.name, b.description);
        } else {
            println!(
                "  {:10} - {} (alias: {})",
                b.name,
                b.description,
                b.aliases.join(", ")
            );
        }
    }
}
