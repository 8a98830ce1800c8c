use std::fmt;
use serde::Serialize;


/// One pattern cell: sample number, period (tone) and 12-bit effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Event {
    pub sample: u8,
    pub tone  : u16,
    pub effect: u16,
}

impl Event {
    /// Split a 32-bit big-endian pattern cell. The sample number is spread
    /// over the high nibbles of the first and third bytes.
    pub fn from_cell(cell: i32) -> Self {
        let v = cell as u32;
        Event {
            sample: (((v >> 24) & 0xf0) + ((v >> 12) & 0x0f)) as u8,
            tone  : ((v >> 16) & 0xfff) as u16,
            effect: (v & 0xfff) as u16,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample == 0 && self.tone == 0 && self.effect == 0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tone = if self.tone == 0 {
            "---".to_owned()
        } else {
            format!("{:03x}", self.tone)
        };

        let sample = if self.sample == 0 {
            "--".to_owned()
        } else {
            format!("{:02x}", self.sample)
        };

        write!(f, "{} {} {:03X}", tone, sample, self.effect)
    }
}
