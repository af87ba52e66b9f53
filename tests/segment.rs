mod tests {
    use led_segment_composer::color::{BLACK, ColorFormat, Rgb};
    use led_segment_composer::{
        Instant, LedStrip, Pattern, SegmentBuffer, SegmentError, StripConfig,
    };

    const FIRST: Rgb = Rgb {
        r: 10,
        g: 20,
        b: 30,
    };
    const LAST: Rgb = Rgb {
        r: 40,
        g: 50,
        b: 60,
    };

    /// Marks the first and the last pixel of its buffer
    struct Marker;

    impl Pattern for Marker {
        fn initialize(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
            let last = buffer.len() - 1;
            buffer.set(0, FIRST);
            buffer.set(last, LAST);
        }
    }

    /// Writes `index + 1` into the red channel of every pixel
    struct Ramp;

    impl Pattern for Ramp {
        #[allow(clippy::cast_possible_truncation)]
        fn initialize(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
            for i in 0..buffer.len() {
                buffer.set(i, Rgb::new(i as u8 + 1, 0, 0));
            }
        }
    }

    #[test]
    fn test_exact_capacity_fits() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        assert!(strip.try_segment(4).is_ok());
        assert!(strip.try_segment(6).is_ok());
        assert_eq!(strip.segments().remaining(), 0);
        assert_eq!(
            strip.try_segment(1).err(),
            Some(SegmentError::OutOfCapacity {
                requested: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_oversized_segment_is_rejected() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let _ = strip.segment(7);
        assert_eq!(
            strip.try_segment(4).err(),
            Some(SegmentError::OutOfCapacity {
                requested: 4,
                remaining: 3
            })
        );
        assert_eq!(strip.segments().allocated(), 7);
        assert_eq!(strip.segments().as_slice().len(), 1);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_segment_panics_when_out_of_capacity() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let _ = strip.segment(11);
    }

    #[test]
    #[should_panic(expected = "length must be positive")]
    fn test_segment_panics_on_zero_length() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let _ = strip.segment(0);
    }

    #[test]
    fn test_segment_table_limit() {
        let mut strip: LedStrip<10, 2> = LedStrip::default();
        let _ = strip.segment(1);
        let _ = strip.segment(1);
        assert_eq!(strip.try_segment(1).err(), Some(SegmentError::TooManySegments));
        assert_eq!(strip.segments().allocated(), 2);
    }

    #[test]
    fn test_segments_tile_the_frame() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let a = strip.segment(3).id();
        let b = strip.segment(3).id();
        let c = strip.segment(4).id();

        let bounds: [(usize, usize); 3] = [a, b, c].map(|id| {
            let conf = strip.segment_config(id).unwrap();
            (conf.start(), conf.stop())
        });
        assert_eq!(bounds, [(0, 2), (3, 5), (6, 9)]);
        assert_eq!(strip.segments().remaining(), 0);
        assert_eq!([a, b, c].map(|id| id.index()), [0, 1, 2]);
    }

    #[test]
    fn test_reversed_segment_indexing() {
        let mut strip: LedStrip<20, 4> = LedStrip::default();
        let _ = strip.segment(10);
        let seg = strip.segment(5).reversed(true).id();

        let conf = strip.segment_config(seg).unwrap();
        assert_eq!(conf.start(), 10);
        assert_eq!(conf.stop(), 14);
        assert!(conf.is_reversed());
        assert_eq!(conf.index_for(0), 14);
        assert_eq!(conf.index_for(4), 10);
    }

    #[test]
    fn test_reversed_segment_render() {
        let mut strip: LedStrip<20, 4, Marker> = LedStrip::default();
        let _ = strip.segment(10);
        let _ = strip.segment(5).reversed(true).tags(&["tail"]);
        strip.set_pattern("tail", Marker).unwrap();

        let frame = strip.render(Instant::from_millis(0));
        assert_eq!(frame[14], FIRST);
        assert_eq!(frame[10], LAST);
        assert_eq!(frame[9], BLACK);
    }

    #[test]
    fn test_mirror_replicates_writes() {
        let mut strip: LedStrip<10, 4, Marker> = LedStrip::default();
        let original = strip.segment(3).tags(&["eyes"]).id();
        let mirror = strip
            .mirror_segment_with_format(original, ColorFormat::Grb)
            .reversed(true)
            .id();
        strip.set_pattern("eyes", Marker).unwrap();

        let conf = strip.segment_config(mirror).unwrap();
        assert_eq!((conf.start(), conf.stop()), (3, 5));
        assert_eq!(conf.mirror_of(), Some(original));
        assert_eq!(strip.segment_config(original).unwrap().mirrors(), &[mirror]);

        let frame = strip.render(Instant::from_millis(0));
        assert_eq!(frame[0], FIRST);
        assert_eq!(frame[2], LAST);
        // Reversed and converted to GRB
        assert_eq!(frame[5], Rgb::new(20, 10, 30));
        assert_eq!(frame[3], Rgb::new(50, 40, 60));
        assert_eq!(frame[6], BLACK);
    }

    #[test]
    fn test_mirrors_are_not_mirrored() {
        let mut strip: LedStrip<10, 4, Marker> = LedStrip::default();
        let original = strip.segment(2).id();
        let mirror = strip.mirror_segment(original).id();
        assert_eq!(
            strip.try_mirror_segment(mirror).err(),
            Some(SegmentError::MirrorOfMirror)
        );
        assert_eq!(strip.segments().allocated(), 4);
    }

    #[test]
    fn test_mirror_must_fit() {
        let mut strip: LedStrip<4, 4, Marker> = LedStrip::default();
        let original = strip.segment(3).id();
        assert_eq!(
            strip.try_mirror_segment(original).err(),
            Some(SegmentError::OutOfCapacity {
                requested: 3,
                remaining: 1
            })
        );
        assert!(strip.segment_config(original).unwrap().mirrors().is_empty());
    }

    #[test]
    fn test_mirrors_never_take_a_pattern() {
        let mut strip: LedStrip<10, 4, Marker> = LedStrip::default();
        let original = strip.segment(3).tags(&["eyes"]).id();
        let mirror = strip.mirror_segment(original).tags(&["eyes"]).id();

        let id = strip.set_pattern("eyes", Marker).unwrap();
        assert_eq!(strip.pattern_of(original), Some(id));
        assert_eq!(strip.pattern_of(mirror), None);

        let global = strip.set_global_pattern(Marker).unwrap();
        assert_eq!(strip.pattern_of(mirror), None);
        assert_eq!(strip.run_order().len(), 1);
        assert_eq!(strip.run_order()[0].pattern(), global);
        assert_eq!(strip.run_order()[0].segments(), &[original]);
    }

    #[test]
    fn test_segment_buffer_spans_segments() {
        let mut strip: LedStrip<7, 4, Ramp> = LedStrip::default();
        let _ = strip.segment(2).tags(&["group"]);
        let _ = strip.segment(3);
        let _ = strip.segment(2).reversed(true).tags(&["group"]);
        strip.set_pattern("group", Ramp).unwrap();

        let frame = strip.render(Instant::from_millis(0));
        let red: [u8; 7] = core::array::from_fn(|i| frame[i].r);
        assert_eq!(red, [1, 2, 0, 0, 0, 4, 3]);
    }

    #[test]
    fn test_tags_have_set_semantics() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let a = strip.segment(2).tags(&["left", "left"]).id();
        strip.add_tags(a, &["left", "front"]).unwrap();
        let _ = strip.segment(3).tags(&["left"]);

        assert_eq!(strip.segment_config(a).unwrap().tags(), &["left", "front"]);
        assert_eq!(strip.segments().tagged("left").len(), 2);
        assert_eq!(strip.segments().tagged("front"), &[a]);
        assert!(strip.segments().tagged("missing").is_empty());
        assert_eq!(strip.length_of_tag("left"), 5);
        assert_eq!(strip.length_of_tag("front"), 2);
        assert_eq!(strip.length_of_tag("missing"), 0);
    }

    #[test]
    fn test_segment_tag_limit() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let tags = ["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"];
        let result = strip.segment(2).try_tags(&tags).map(|segment| segment.id());
        assert_eq!(result, Err(SegmentError::TooManyTags));
    }

    #[test]
    fn test_strip_tag_limit() {
        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let _ = strip.segment(2).tags(&["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7"]);
        let _ = strip
            .segment(2)
            .tags(&["t8", "t9", "t10", "t11", "t12", "t13", "t14", "t15"]);

        // Known tags still fit, a new one does not
        let c = strip.segment(2).id();
        assert_eq!(strip.add_tags(c, &["t3"]), Ok(()));
        assert_eq!(strip.add_tags(c, &["t16"]), Err(SegmentError::TooManyTags));
        assert!(strip.segments().tagged("t16").is_empty());
    }

    #[test]
    fn test_unknown_segment() {
        let mut other: LedStrip<10, 4> = LedStrip::default();
        let _ = other.segment(1);
        let foreign = other.segment(1).id();

        let mut strip: LedStrip<10, 4> = LedStrip::default();
        let _ = strip.segment(1);
        assert_eq!(
            strip.add_tags(foreign, &["x"]),
            Err(SegmentError::UnknownSegment)
        );
        assert_eq!(
            strip.try_mirror_segment(foreign).err(),
            Some(SegmentError::UnknownSegment)
        );
    }

    #[test]
    fn test_default_format_from_config() {
        let mut strip: LedStrip<4, 2> = LedStrip::new(&StripConfig {
            format: ColorFormat::Grb,
        });
        let a = strip.segment(2).id();
        let b = strip.segment_with_format(2, ColorFormat::Rgb).id();
        assert_eq!(strip.segment_config(a).unwrap().format(), ColorFormat::Grb);
        assert_eq!(strip.segment_config(b).unwrap().format(), ColorFormat::Rgb);
    }

    #[test]
    fn test_error_messages() {
        let err = SegmentError::OutOfCapacity {
            requested: 5,
            remaining: 2,
        };
        assert_eq!(
            format!("{}", err),
            "segment of 5 LEDs does not fit, only 2 remaining"
        );
        assert_eq!(
            format!("{}", SegmentError::MirrorOfMirror),
            "a mirror segment cannot be mirrored"
        );
    }
}
