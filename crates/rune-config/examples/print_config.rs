/// Example program to print the loaded motion configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml, then RUNE_* env overrides
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Motion Configuration ===\n");

    println!("Motion Settings:");
    println!("  Default Duration: {}ms", config.motion.default_duration_ms);
    println!("  Default Delay: {}ms", config.motion.default_delay_ms);
    println!("  Default Easing: {}", config.motion.default_easing);
    println!("  Instant: {}", config.motion.instant);
    println!();

    println!("Gesture Settings:");
    println!("  Drag Threshold: {}px", config.gestures.drag_threshold_px);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
