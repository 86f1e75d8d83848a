use anyhow::Result;
use squeeze_core::config::{Preset, ScanConfig};

pub fn run() -> Result<()> {
    println!("{}", format_presets());
    Ok(())
}

fn format_presets() -> String {
    let mut lines = vec![format!(
        "{:<10} {:>8} {:>5} {:>10} {:>7} {:>5} {:>10} {:>7}",
        "preset", "lookback", "bars", "squeeze", "margin", "k", "floor", "workers"
    )];
    for preset in Preset::ALL {
        let config = ScanConfig::from_preset(preset);
        let policy = &config.policy;
        let floor = policy
            .liquidity_floor
            .map(|f| format!("{:.0}", f))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<10} {:>8} {:>5} {:>10} {:>6.1}% {:>5.1} {:>10} {:>7}",
            preset.to_string(),
            config.lookback.to_string(),
            policy.required_bars(),
            policy.containment.to_string(),
            policy.breakout_margin * 100.0,
            policy.volume_multiplier,
            floor,
            config.workers
        ));
        lines.push(format!("           {}", preset.description()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_preset() {
        let text = format_presets();
        for preset in Preset::ALL {
            assert!(text.contains(&preset.to_string()));
        }
        assert!(text.contains("500000"));
    }
}
