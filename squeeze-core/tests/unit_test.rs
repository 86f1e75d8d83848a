//! Unit tests for squeeze-core modules

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use squeeze_core::config::{Containment, Preset, ScanConfig};
    use squeeze_core::data::{
        BarSeries, DailyBar, Instrument, InstrumentKind, Lookback, Market, SymbolRecord, UniverseEnumerator, Venue,
    };
    use squeeze_core::indicators::{calculate_bands, BollingerBands, Indicator, SMA};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_bar_series_ordering() {
        let series = BarSeries::from_vec(vec![
            DailyBar::new(day(3), 12.0, 300),
            DailyBar::new(day(1), 10.0, 100),
            DailyBar::new(day(2), 11.0, 200),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.volumes(), vec![100.0, 200.0, 300.0]);
        assert_eq!(series.last().unwrap().date, day(3));
    }

    #[test]
    fn test_rows_with_gaps_are_dropped() {
        assert!(DailyBar::from_row(day(1), None, Some(100)).is_none());
        assert!(DailyBar::from_row(day(1), Some(10.0), None).is_none());
        assert!(DailyBar::from_row(day(1), Some(f64::NAN), Some(100)).is_none());
        assert_eq!(
            DailyBar::from_row(day(1), Some(10.0), Some(0)),
            Some(DailyBar::new(day(1), 10.0, 0))
        );
    }

    #[test]
    fn test_symbol_provider_suffix() {
        let listed = SymbolRecord::new("2330", "台積電", "半導體業", Venue::Listed);
        let otc = SymbolRecord::new("6488", "環球晶", "半導體業", Venue::OverTheCounter);

        assert_eq!(listed.provider_symbol(), "2330.TW");
        assert_eq!(otc.provider_symbol(), "6488.TWO");
    }

    #[test]
    fn test_universe_keeps_only_equities_on_tracked_boards() {
        let instruments = vec![
            Instrument {
                code: "2330".into(),
                name: "台積電".into(),
                group: "半導體業".into(),
                market: Market::from_label("上市"),
                kind: InstrumentKind::from_label("股票"),
            },
            Instrument {
                code: "0050".into(),
                name: "元大台灣50".into(),
                group: "".into(),
                market: Market::from_label("上市"),
                kind: InstrumentKind::from_label("ETF"),
            },
            Instrument {
                code: "6488".into(),
                name: "環球晶".into(),
                group: "半導體業".into(),
                market: Market::from_label("上櫃"),
                kind: InstrumentKind::from_label("股票"),
            },
            Instrument {
                code: "7799".into(),
                name: "禾榮科".into(),
                group: "生技醫療業".into(),
                market: Market::from_label("興櫃"),
                kind: InstrumentKind::from_label("股票"),
            },
        ];

        let universe = UniverseEnumerator::from_instruments(instruments);
        let codes: Vec<&str> = universe.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["2330", "6488"]);
        assert_eq!(universe[1].venue, Venue::OverTheCounter);
    }

    #[test]
    fn test_sma_indicator() {
        let mut sma = SMA::new(3).unwrap();
        assert_eq!(sma.name(), "SMA");
        assert!(!sma.is_ready());

        for v in [1.0, 2.0, 3.0, 4.0] {
            sma.update(v);
        }
        assert!(sma.is_ready());
        assert_eq!(sma.value(), Some(3.0));
    }

    #[test]
    fn test_bands_use_sample_deviation() {
        let mut bands = BollingerBands::new(4, 2.0).unwrap();
        for v in [2.0, 4.0, 4.0, 6.0] {
            bands.update(v);
        }
        // mean 4, sample variance 8/3
        let expected = 4.0 + 2.0 * (8.0f64 / 3.0).sqrt();
        assert!((bands.upper().unwrap() - expected).abs() < 1e-9);
        assert_eq!(bands.middle(), Some(4.0));
    }

    #[test]
    fn test_band_series_warmup() {
        let closes: Vec<f64> = (1..=25).map(|i| i as f64).collect();
        let bands = calculate_bands(&closes, 20, 2.0).unwrap();
        assert!(bands[18].is_none());
        assert!(bands[19].is_some());
        assert_eq!(bands[24].unwrap().middle, 15.5);
    }

    #[test]
    fn test_presets() {
        for preset in Preset::ALL {
            let parsed: Preset = preset.to_string().parse().unwrap();
            assert_eq!(parsed, preset);
            assert!(preset.policy().validate().is_ok());
        }

        let loose = ScanConfig::from_preset(Preset::Loose);
        assert_eq!(loose.lookback, Lookback::SixMonths);
        assert_eq!(loose.policy.containment, Containment::Inclusive);
        assert_eq!(loose.policy.required_bars(), 24);

        assert!("aggressive".parse::<Preset>().is_err());
    }

    #[test]
    fn test_containment_boundary() {
        assert!(!Containment::Strict.holds(10.0, 10.0));
        assert!(Containment::Inclusive.holds(10.0, 10.0));
        assert!(!Containment::Inclusive.holds(10.01, 10.0));
    }
}
