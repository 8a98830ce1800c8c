//! Soundtracker 15-instrument formats.
//!
//! Ultimate Soundtracker and its descendants share one layout: a 20-byte
//! title, 15 sample headers of 30 bytes, a 128-entry position table and
//! patterns starting at offset 600. They differ in limits and effects.

use crate::format::{ModuleFormat, PadLayout, Signature};

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

// UST: only arpeggio and pitchbend
const UST_EFFECTS: &[(&str, u16)] = &[
    ("ARP",   0x100),
    ("PORTA", 0x200),
    ("NONE",  0x000),
];

const DOC_EFFECTS: &[(&str, u16)] = &[
    ("ARP",        0x000),
    ("PORTA_UP",   0x100),
    ("PORTA_DOWN", 0x200),
    ("VOLUME",     0xc00),
    ("BREAK",      0xd00),
    ("FILTER",     0xe00),
    ("SPEED",      0xf00),
];

const ST9_EFFECTS: &[(&str, u16)] = &[
    ("ARP",        0x000),
    ("PORTA_UP",   0x100),
    ("PORTA_DOWN", 0x200),
    ("JUMP",       0xb00),
    ("VOLUME",     0xc00),
    ("BREAK",      0xd00),
    ("FILTER",     0xe00),
    ("SPEED",      0xf00),
];

const MST_EFFECTS: &[(&str, u16)] = &[
    ("ARP",        0x000),
    ("PORTA_UP",   0x100),
    ("PORTA_DOWN", 0x200),
    ("VOLSLIDE",   0xa00),
    ("JUMP",       0xb00),
    ("VOLUME",     0xc00),
    ("BREAK",      0xd00),
    ("FILTER",     0xe00),
    ("SPEED",      0xf00),
];

const ST2_EFFECTS: &[(&str, u16)] = &[
    ("ARP",        0x000),
    ("PORTA_UP",   0x100),
    ("PORTA_DOWN", 0x200),
    ("TONEPORTA",  0x300),
    ("VIBRATO",    0x400),
    ("VOLSLIDE",   0xa00),
    ("JUMP",       0xb00),
    ("VOLUME",     0xc00),
    ("BREAK",      0xd00),
    ("FILTER",     0xe00),
    ("SPEED",      0xf00),
];


pub fn ultimate_soundtracker() -> ModuleFormat {
    ModuleFormat {
        id         : "ust",
        name       : "Ultimate Soundtracker 1.2",
        author     : "Karsten Obarski",
        description: "an original 1987 tracker for AMIGA",
        extensions : &["MOD", "UST"],

        tracks     : 4,
        samples    : 15,
        positions  : 128,
        rows       : 64,
        patterns   : 128,
        cell_size  : 4,
        magic_size : 0,
        check_pattern_range: false,

        name_size         : 20,
        sample_name_size  : 22,
        sample_header_size: 30,

        // UST: Maximum sample length is 9999 bytes decimal. Longest
        // samples on original sample disk ST-01 were 9900 bytes.
        max_volume             : 0x40,
        max_sample_size        : 9999,
        recommended_sample_size: 9900,
        sample_name_prefix     : Some("st-"),
        name_not_recommended   : LOWERCASE,
        repeat_in_words        : false,
        finetune               : false,

        // C-3 replay rate
        sample_rate : 16574,
        sample_width: 1,
        channels    : 1,

        effects    : UST_EFFECTS,
        flag_bytes : Signature::new(),
        // default tempo of 120 BPM
        guess_bytes: Signature::from_table(&[(471, &[0x78])]),
        pad_layout : PadLayout::NameEnds,
        zero_pads  : Signature::new(),
    }
}

pub fn ultimate_soundtracker_2() -> ModuleFormat {
    ModuleFormat {
        id                : "ust2",
        name              : "Ultimate Soundtracker 2.0",
        description       : "the 1988 revision of Ultimate Soundtracker",
        sample_name_prefix: None,
        ..ultimate_soundtracker()
    }
}

pub fn soundtracker_ii() -> ModuleFormat {
    ModuleFormat {
        id                     : "dst2",
        name                   : "Soundtracker II",
        author                 : "Unknown / D.O.C.",
        description            : "the D.O.C. Soundtracker with the extended effect set",
        extensions             : &["MOD", "STK"],
        patterns               : 64,
        max_sample_size        : 0x10000,
        recommended_sample_size: 0x10000,
        name_not_recommended   : "",
        effects                : DOC_EFFECTS,
        ..ultimate_soundtracker_2()
    }
}

pub fn soundtracker_iii() -> ModuleFormat {
    ModuleFormat {
        id                 : "dst3",
        name               : "Soundtracker III",
        description        : "D.O.C. Soundtracker enforcing the 64 pattern limit",
        check_pattern_range: true,
        ..soundtracker_ii()
    }
}

pub fn soundtracker_ix() -> ModuleFormat {
    ModuleFormat {
        id         : "dst9",
        name       : "Soundtracker IX",
        description: "D.O.C. Soundtracker with position jump",
        effects    : ST9_EFFECTS,
        ..soundtracker_iii()
    }
}

pub fn master_soundtracker() -> ModuleFormat {
    ModuleFormat {
        id         : "mst",
        name       : "Master Soundtracker 1.0",
        author     : "Tip / The New Masters",
        description: "Soundtracker IX derivative with volume slide",
        extensions : &["MOD", "MST"],
        effects    : MST_EFFECTS,
        ..soundtracker_ix()
    }
}

pub fn soundtracker_2() -> ModuleFormat {
    ModuleFormat {
        id         : "st2x",
        name       : "Soundtracker 2.x",
        author     : "Mnemotron / Spreadpoint",
        description: "the last 15-instrument Soundtracker, with tone portamento and vibrato",
        extensions : &["MOD", "STK"],
        effects    : ST2_EFFECTS,
        ..master_soundtracker()
    }
}


#[cfg(test)]
mod tests {
    use crate::format;

    #[test]
    fn test_common_layout() {
        for id in &["ust", "ust2", "dst2", "dst3", "dst9", "mst", "st2x"] {
            let fmt = format::by_id(id).unwrap();
            assert_eq!(fmt.samples, 15, "{}", id);
            assert_eq!(fmt.pattern_offset(), 600, "{}", id);
            assert_eq!(fmt.magic_size, 0, "{}", id);
            assert!(fmt.flag_bytes.is_empty(), "{}", id);
            assert_eq!(fmt.guess_bytes.get(fmt.song_offset() + 1), Some(&[0x78_u8][..]), "{}", id);
        }
    }

    #[test]
    fn test_pattern_range_check() {
        let checked: Vec<&str> = format::list().iter()
            .filter(|f| f.samples == 15 && f.check_pattern_range)
            .map(|f| f.id)
            .collect();
        assert_eq!(checked, vec!["dst3", "dst9", "mst", "st2x"]);
    }

    #[test]
    fn test_overrides() {
        let ust = format::by_id("ust").unwrap();
        let ust2 = format::by_id("ust2").unwrap();
        assert_eq!(ust.sample_name_prefix, Some("st-"));
        assert_eq!(ust2.sample_name_prefix, None);
        assert_eq!(ust2.max_sample_size, ust.max_sample_size);

        let mst = format::by_id("mst").unwrap();
        assert_eq!(mst.effect_name(0xa01), Some("VOLSLIDE"));
        assert_eq!(format::by_id("dst9").unwrap().effect_name(0xa01), None);
    }
}
