//! 31-instrument "M.K." formats.

use crate::format::{st, ModuleFormat, PadLayout, Signature};

const NT_EFFECTS: &[(&str, u16)] = &[
    ("ARP",              0x000),
    ("PORTA_UP",         0x100),
    ("PORTA_DOWN",       0x200),
    ("TONEPORTA",        0x300),
    ("VIBRATO",          0x400),
    ("TONEPORTA_VOLSLIDE", 0x500),
    ("VIBRATO_VOLSLIDE", 0x600),
    ("VOLSLIDE",         0xa00),
    ("JUMP",             0xb00),
    ("VOLUME",           0xc00),
    ("BREAK",            0xd00),
    ("FILTER",           0xe00),
    ("SPEED",            0xf00),
];

const PT_EFFECTS: &[(&str, u16)] = &[
    ("ARP",              0x000),
    ("PORTA_UP",         0x100),
    ("PORTA_DOWN",       0x200),
    ("TONEPORTA",        0x300),
    ("VIBRATO",          0x400),
    ("TONEPORTA_VOLSLIDE", 0x500),
    ("VIBRATO_VOLSLIDE", 0x600),
    ("TREMOLO",          0x700),
    ("OFFSET",           0x900),
    ("VOLSLIDE",         0xa00),
    ("JUMP",             0xb00),
    ("VOLUME",           0xc00),
    ("BREAK",            0xd00),
    ("EXTENDED",         0xe00),
    ("SPEED",            0xf00),
];

// 20 + 31 * 30 + 2 + 128
const MAGIC_OFFSET: usize = 1080;


pub fn noisetracker() -> ModuleFormat {
    ModuleFormat {
        id                     : "nt",
        name                   : "NoiseTracker",
        author                 : "Mahoney & Kaktus",
        description            : "the first 31-instrument tracker, tagged M.K.",
        extensions             : &["MOD", "NT"],
        samples                : 31,
        magic_size             : 4,
        max_sample_size        : 0x10000,
        recommended_sample_size: 0x10000,
        repeat_in_words        : true,
        effects                : NT_EFFECTS,
        flag_bytes             : Signature::from_table(&[(MAGIC_OFFSET, b"M.K.")]),
        // Noisetracker restart byte, see MOD.Data City Remix
        guess_bytes            : Signature::from_table(&[(951, &[0x78])]),
        pad_layout             : PadLayout::VolumeWords,
        ..st::soundtracker_2()
    }
}

pub fn protracker() -> ModuleFormat {
    ModuleFormat {
        id                     : "pt",
        name                   : "Protracker",
        author                 : "Lars Hamre / Amiga Freelancers",
        description            : "M.K. format with finetune and extended effects",
        extensions             : &["MOD", "PT"],
        max_sample_size        : 0x1fffe,
        recommended_sample_size: 0x10000,
        finetune               : true,
        effects                : PT_EFFECTS,
        guess_bytes            : Signature::from_table(&[(951, &[0x7f])]),
        ..noisetracker()
    }
}
