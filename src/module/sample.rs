use serde::Serialize;


/// Sample header plus the PCM payload once it has been read. Lengths and
/// offsets are in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sample {
    pub name         : String,
    pub length       : usize,
    pub volume       : u16,
    pub finetune     : u8,
    pub repeat_offset: usize,
    pub repeat_length: usize,
    #[serde(rename = "loop")]
    pub looped       : bool,
    #[serde(skip)]
    pub data         : Option<Vec<u8>>,
}

impl Sample {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn has_data(&self) -> bool {
        self.data.as_ref().map_or(false, |d| !d.is_empty())
    }

    /// Loop end in bytes, if the sample loops.
    pub fn loop_end(&self) -> Option<usize> {
        if self.looped {
            Some(self.repeat_offset + self.repeat_length)
        } else {
            None
        }
    }
}
