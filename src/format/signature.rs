use std::collections::BTreeMap;
use crate::format::ModuleFormat;

const ZERO: &[u8] = &[0];


/// A sparse table of expected byte strings keyed by file offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    bytes: BTreeMap<usize, &'static [u8]>,
}

impl Signature {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_table(table: &[(usize, &'static [u8])]) -> Self {
        Signature {
            bytes: table.iter().cloned().collect(),
        }
    }

    pub fn insert(&mut self, ofs: usize, b: &'static [u8]) {
        self.bytes.insert(ofs, b);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, ofs: usize) -> Option<&'static [u8]> {
        self.bytes.get(&ofs).cloned()
    }

    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.bytes.keys().cloned()
    }

    /// Check every expected slice against the buffer. Data past the end
    /// of the buffer never matches.
    pub fn matches(&self, b: &[u8]) -> bool {
        for (&ofs, expected) in &self.bytes {
            let found = ofs.checked_add(expected.len()).and_then(|end| b.get(ofs..end));
            match found {
                Some(v) if v == *expected => {}
                Some(_) => {
                    debug!("wrong byte value at offset {}, expected {:?}", ofs, expected);
                    return false
                }
                None => {
                    debug!("end of file reached at offset {}", ofs);
                    return false
                }
            }
        }
        true
    }
}


/// Zero-pad construction strategies. Each format names the one matching
/// its field layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadLayout {
    NameEnds,
    VolumeWords,
}

impl PadLayout {
    pub fn generate(self, fmt: &ModuleFormat) -> Signature {
        match self {
            PadLayout::NameEnds    => name_end_pads(fmt),
            PadLayout::VolumeWords => volume_word_pads(fmt),
        }
    }
}

/// Expect a null at the end of the module name, at the end of every
/// sample name, and in the high byte of every volume word.
pub fn name_end_pads(fmt: &ModuleFormat) -> Signature {
    let mut sig = Signature::new();

    let mut ofs = fmt.name_size - 1;
    sig.insert(ofs, ZERO);
    ofs += fmt.sample_name_size;
    for _ in 0..fmt.samples {
        sig.insert(ofs, ZERO);
        sig.insert(ofs + 3, ZERO);
        ofs += fmt.sample_header_size;
    }

    sig
}

/// Names may fill their whole field, so only the volume high byte is
/// checked. Formats storing finetune there get no zero pads at all.
pub fn volume_word_pads(fmt: &ModuleFormat) -> Signature {
    let mut sig = Signature::new();
    if fmt.finetune {
        return sig
    }

    let mut ofs = fmt.name_size + fmt.sample_name_size + 2;
    for _ in 0..fmt.samples {
        sig.insert(ofs, ZERO);
        ofs += fmt.sample_header_size;
    }

    sig
}
