mod tests {
    use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use led_segment_composer::color::{BLACK, BLUE, GREEN, RED, Rgb, WHITE, hsv2rgb, rgb_from_u32};
    use led_segment_composer::pattern::{
        Alliance, CylonPattern, DEFAULT_INTERVAL, FlashPattern, MeterPattern, RainbowRoad,
        SpinPattern,
    };
    use led_segment_composer::{Duration, Hsv, Instant, LedStrip, PatternSlot};

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn strip_of<const LEDS: usize>(pattern: PatternSlot) -> LedStrip<LEDS, 1> {
        let mut strip: LedStrip<LEDS, 1> = LedStrip::default();
        let _ = strip.segment(LEDS);
        strip.set_global_pattern(pattern).unwrap();
        strip
    }

    fn lit_position(frame: &[Rgb], color: Rgb) -> Option<usize> {
        frame.iter().position(|led| *led == color)
    }

    #[test]
    fn test_flash_toggles_on_interval() {
        let mut strip = strip_of::<4>(PatternSlot::flash(RED, Duration::from_millis(50)));

        assert_eq!(strip.render(at(0)), &[RED; 4]);
        assert_eq!(strip.render(at(20)), &[RED; 4]);
        assert_eq!(strip.render(at(50)), &[BLACK; 4]);
        assert_eq!(strip.render(at(99)), &[BLACK; 4]);
        assert_eq!(strip.render(at(100)), &[RED; 4]);
    }

    #[test]
    fn test_animation_catches_up_within_two_intervals() {
        let mut strip = strip_of::<2>(PatternSlot::flash(WHITE, Duration::from_millis(50)));
        strip.render(at(0));

        // 90 ms late: one toggle now, the next one stays on the original grid
        assert_eq!(strip.render(at(90)), &[BLACK; 2]);
        assert_eq!(strip.render(at(100)), &[WHITE; 2]);
    }

    #[test]
    fn test_animation_restarts_after_a_stall() {
        let mut strip = strip_of::<2>(PatternSlot::flash(WHITE, Duration::from_millis(50)));
        strip.render(at(0));

        // A single toggle, and the timer restarts from 300 ms
        assert_eq!(strip.render(at(300)), &[BLACK; 2]);
        assert_eq!(strip.render(at(340)), &[BLACK; 2]);
        assert_eq!(strip.render(at(350)), &[WHITE; 2]);
    }

    #[test]
    fn test_animated_interval() {
        let flash = FlashPattern::new(RED).every(DEFAULT_INTERVAL);
        assert_eq!(flash.interval(), Duration::from_millis(50));
        assert!(flash.animation().is_on());

        let slow = flash.with_interval(Duration::from_millis(200));
        assert_eq!(slow.interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_cylon_bounces() {
        let mut strip = strip_of::<3>(PatternSlot::cylon(RED));
        assert_eq!(strip.render(at(0)), &[BLACK; 3]);

        let mut positions = [None; 6];
        for (step, position) in positions.iter_mut().enumerate() {
            let frame = strip.render(at(50 * (step as u64 + 1)));
            *position = lit_position(frame, RED);
        }
        assert_eq!(
            positions,
            [Some(1), Some(2), Some(1), Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn test_cylon_lights_one_pixel() {
        let mut strip = strip_of::<8>(CylonPattern::new(BLUE).animated().into());
        strip.render(at(0));
        let frame = strip.render(at(50));
        assert_eq!(frame.iter().filter(|led| **led == BLUE).count(), 1);
        assert_eq!(frame.iter().filter(|led| **led == BLACK).count(), 7);
    }

    #[test]
    fn test_spin_wraps() {
        let mut strip = strip_of::<3>(SpinPattern::default().animated().into());
        strip.render(at(0));

        let mut positions = [None; 4];
        for (step, position) in positions.iter_mut().enumerate() {
            let frame = strip.render(at(50 * (step as u64 + 1)));
            *position = lit_position(frame, GREEN);
        }
        assert_eq!(positions, [Some(1), Some(2), Some(0), Some(1)]);
    }

    #[test]
    fn test_meter_lit_count() {
        assert_eq!(MeterPattern::lit_count(0.0, 10), 0);
        assert_eq!(MeterPattern::lit_count(0.05, 10), 1);
        assert_eq!(MeterPattern::lit_count(0.5, 10), 5);
        assert_eq!(MeterPattern::lit_count(0.26, 4), 2);
        assert_eq!(MeterPattern::lit_count(1.0, 10), 10);
        assert_eq!(MeterPattern::lit_count(1.5, 10), 10);
        assert_eq!(MeterPattern::lit_count(-1.0, 10), 0);
        assert_eq!(MeterPattern::lit_count(f32::NAN, 10), 0);
        assert_eq!(MeterPattern::lit_count(0.7, 0), 0);
    }

    static METER_LEVEL: AtomicU32 = AtomicU32::new(0);

    fn meter_level() -> f32 {
        f32::from_bits(METER_LEVEL.load(Ordering::Relaxed))
    }

    fn set_meter_level(level: f32) {
        METER_LEVEL.store(level.to_bits(), Ordering::Relaxed);
    }

    #[test]
    fn test_meter_follows_level() {
        set_meter_level(0.5);
        let mut strip = strip_of::<4>(PatternSlot::meter(GREEN, meter_level));
        strip.render(at(0));

        assert_eq!(strip.render(at(50)), &[GREEN, GREEN, BLACK, BLACK]);

        set_meter_level(1.0);
        assert_eq!(strip.render(at(100)), &[GREEN; 4]);

        set_meter_level(0.0);
        assert_eq!(strip.render(at(150)), &[BLACK; 4]);
    }

    static ENABLED: AtomicBool = AtomicBool::new(false);

    fn enabled() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }

    #[test]
    fn test_indicator_follows_state() {
        let mut strip = strip_of::<3>(PatternSlot::indicator(GREEN, RED, enabled));
        assert_eq!(strip.render(at(0)), &[RED; 3]);

        ENABLED.store(true, Ordering::Relaxed);
        assert_eq!(strip.render(at(20)), &[GREEN; 3]);

        ENABLED.store(false, Ordering::Relaxed);
        assert_eq!(strip.render(at(40)), &[RED; 3]);
    }

    static SUPPLIED: AtomicU32 = AtomicU32::new(0x00ff_8000);

    fn supplied() -> Rgb {
        rgb_from_u32(SUPPLIED.load(Ordering::Relaxed))
    }

    #[test]
    fn test_supplier_reads_every_frame() {
        let mut strip = strip_of::<2>(PatternSlot::supplier(supplied));
        assert_eq!(strip.render(at(0)), &[Rgb::new(255, 128, 0); 2]);

        SUPPLIED.store(0x0000_00ff, Ordering::Relaxed);
        assert_eq!(strip.render(at(20)), &[BLUE; 2]);
    }

    fn blue_alliance() -> Option<Alliance> {
        Some(Alliance::Blue)
    }

    fn red_alliance() -> Option<Alliance> {
        Some(Alliance::Red)
    }

    fn no_alliance() -> Option<Alliance> {
        None
    }

    #[test]
    fn test_alliance_colors() {
        let mut strip = strip_of::<2>(PatternSlot::alliance(blue_alliance));
        assert_eq!(strip.render(at(0)), &[BLUE; 2]);

        strip.set_global_pattern(PatternSlot::alliance(red_alliance));
        assert_eq!(strip.render(at(20)), &[RED; 2]);

        strip.set_global_pattern(PatternSlot::alliance(no_alliance));
        assert_eq!(strip.render(at(40)), &[BLACK; 2]);
    }

    #[test]
    fn test_rainbow_hues() {
        let rainbow = RainbowRoad::new();
        assert_eq!(rainbow.hue_at(0, 4), 0);
        assert_eq!(rainbow.hue_at(1, 4), 64);
        assert_eq!(rainbow.hue_at(3, 4), 192);
        assert_eq!(rainbow.hue_at(0, 0), 0);
    }

    #[test]
    fn test_rainbow_rotates() {
        let mut strip: LedStrip<4, 1, RainbowRoad> = LedStrip::default();
        let _ = strip.segment(4);
        let id = strip.set_global_pattern(RainbowRoad::new()).unwrap();

        let hsv = |hue| {
            hsv2rgb(Hsv {
                hue,
                sat: 255,
                val: 128,
            })
        };

        let frame = strip.render(at(0));
        assert_eq!(frame[0], hsv(0));
        assert_eq!(frame[1], hsv(64));
        assert_eq!(frame[3], hsv(192));

        let frame = strip.render(at(20));
        assert_eq!(frame[0], hsv(252));
        assert_eq!(frame[1], hsv(60));
        assert_eq!(strip.pattern(id).unwrap().first_hue(), 248);
    }

    #[test]
    fn test_solid_paints_once() {
        let mut strip = strip_of::<3>(PatternSlot::solid(GREEN));
        assert_eq!(strip.render(at(0)), &[GREEN; 3]);
        assert_eq!(strip.render(at(1000)), &[GREEN; 3]);
    }

    #[test]
    fn test_pattern_names() {
        assert_eq!(PatternSlot::solid(RED).name(), "solid");
        assert_eq!(PatternSlot::flash(RED, DEFAULT_INTERVAL).name(), "flash");
        assert_eq!(PatternSlot::cylon(RED).name(), "cylon");
        assert_eq!(PatternSlot::spin(RED).name(), "spin");
        assert_eq!(PatternSlot::meter(RED, meter_level).name(), "meter");
        assert_eq!(PatternSlot::fire(10).name(), "fire");
        assert_eq!(PatternSlot::cold_fire(10).name(), "cold_fire");
        assert_eq!(PatternSlot::indicator(RED, BLUE, enabled).name(), "indicator");
        assert_eq!(PatternSlot::supplier(supplied).name(), "supplier");
        assert_eq!(PatternSlot::alliance(no_alliance).name(), "alliance");
        assert_eq!(PatternSlot::rainbow().name(), "rainbow");
    }
}
