//! Write decoded modules to disk: one WAV file per sample and a JSON
//! record with everything else.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::module::{Module, Pattern, Sample};
use crate::util::safe_filename;
use crate::Error;

pub const PROJECT_SUFFIX: &str = "_unpacked";
pub const SAMPLE_DIR: &str = "samples";


#[derive(Serialize)]
struct SampleRecord<'a> {
    #[serde(flatten)]
    sample: &'a Sample,
    data  : Option<String>,
}

#[derive(Serialize)]
struct ModuleRecord<'a> {
    name              : &'a str,
    filename          : &'a str,
    format            : &'a str,
    samples           : BTreeMap<usize, Option<SampleRecord<'a>>>,
    length            : usize,
    tempo             : u8,
    positions         : &'a [u8],
    max_pattern_number: usize,
    patterns          : &'a [Pattern],
}


/// Paths used when unpacking one module file.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub path       : PathBuf,
    pub sample_path: PathBuf,
}

impl Project {
    pub fn new(working_dir: &Path, filename: &str) -> Self {
        let path = working_dir.join(format!("{}{}", filename, PROJECT_SUFFIX));
        let sample_path = path.join(SAMPLE_DIR);
        Project {
            path,
            sample_path,
        }
    }

    pub fn create(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.sample_path)?;
        Ok(())
    }

    pub fn record_path(&self, filename: &str) -> PathBuf {
        self.path.join(format!("{}.json", filename))
    }
}

/// File name for a sample, from its 1-based slot number and name.
pub fn sample_filename(num: usize, name: &str) -> String {
    format!("{:02} {}.wav", num + 1, safe_filename(name))
}

pub fn unpack(module: &Module, filename: &str, working_dir: &Path) -> Result<Project, Error> {
    debug!("unpacking {}", filename);

    let project = Project::new(working_dir, filename);
    project.create()?;

    let mut samples = BTreeMap::new();
    for (i, smp) in module.samples.iter().enumerate() {
        let rec = match smp {
            Some(smp) => {
                let data = match smp.data {
                    Some(ref data) if !data.is_empty() => {
                        let name = sample_filename(i, &smp.name);
                        write_wav(&project.sample_path.join(&name), data, module)?;
                        Some(name)
                    }
                    _ => None,
                };
                Some(SampleRecord{sample: smp, data})
            }
            None => None,
        };
        samples.insert(i, rec);
    }

    let record = ModuleRecord {
        name              : &module.name,
        filename,
        format            : module.format.name,
        samples,
        length            : module.song.length,
        tempo             : module.song.tempo,
        positions         : &module.song.positions,
        max_pattern_number: module.song.max_pattern_number,
        patterns          : &module.patterns,
    };

    let file = File::create(project.record_path(filename))?;
    serde_json::to_writer(BufWriter::new(file), &record)?;

    debug!("unpacked {} to {}", filename, project.path.display());
    Ok(project)
}

fn write_wav(path: &Path, data: &[u8], module: &Module) -> Result<(), Error> {
    let fmt = module.format;
    let spec = hound::WavSpec {
        channels       : fmt.channels,
        sample_rate    : fmt.sample_rate,
        bits_per_sample: fmt.sample_width * 8,
        sample_format  : hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_error)?;
    match fmt.sample_width {
        1 => {
            for &x in data {
                writer.write_sample(x as i8).map_err(wav_error)?;
            }
        }
        2 => {
            for x in data.chunks(2) {
                let v = if x.len() == 2 { i16::from_be_bytes([x[0], x[1]]) } else { (x[0] as i16) << 8 };
                writer.write_sample(v).map_err(wav_error)?;
            }
        }
        w => return Err(Error::Load(format!("unsupported sample width {}", w))),
    }
    writer.finalize().map_err(wav_error)?;

    Ok(())
}

fn wav_error(err: hound::Error) -> Error {
    match err {
        hound::Error::IoError(e) => Error::Io(e),
        e => Error::Io(io::Error::new(io::ErrorKind::Other, e)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{self, testdata::Builder};
    use tempfile::TempDir;

    #[test]
    fn test_sample_filename() {
        assert_eq!(sample_filename(0, "st-01:bassdrum"), "01 st-01bassdrum.wav");
        assert_eq!(sample_filename(14, ""), "15 .wav");
    }

    #[test]
    fn test_project_paths() {
        let p = Project::new(Path::new("/tmp/out"), "mod.song");
        assert_eq!(p.path, PathBuf::from("/tmp/out/mod.song_unpacked"));
        assert_eq!(p.sample_path, PathBuf::from("/tmp/out/mod.song_unpacked/samples"));
        assert_eq!(p.record_path("mod.song"), PathBuf::from("/tmp/out/mod.song_unpacked/mod.song.json"));
    }

    #[test]
    fn test_unpack() {
        let dir = TempDir::new().unwrap();
        let ust = format::by_id("ust").unwrap();
        let b = Builder::new(ust)
            .name("TEST SONG")
            .sample(0, "st-01:bass", 8, 64, 0, 1)
            .sample(2, "st-01:empty", 0, 0, 0, 1)
            .build();
        let m = ust.load(&b).unwrap();

        let project = unpack(&m, "mod.test", dir.path()).unwrap();
        assert!(project.sample_path.is_dir());

        let wav = project.sample_path.join("01 st-01bass.wav");
        let reader = hound::WavReader::open(&wav).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16574);
        assert_eq!(spec.bits_per_sample, 8);
        assert_eq!(reader.len(), 16);
        assert!(!project.sample_path.join("03 st-01empty.wav").exists());

        let text = fs::read_to_string(project.record_path("mod.test")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["name"], "TEST SONG");
        assert_eq!(v["filename"], "mod.test");
        assert_eq!(v["format"], "Ultimate Soundtracker 1.2");
        assert_eq!(v["length"], 1);
        assert_eq!(v["tempo"], 0x78);
        assert_eq!(v["positions"].as_array().map(|a| a.len()), Some(128));
        assert_eq!(v["max_pattern_number"], 0);
        assert_eq!(v["samples"]["0"]["data"], "01 st-01bass.wav");
        assert_eq!(v["samples"]["0"]["length"], 16);
        assert_eq!(v["samples"]["0"]["loop"], false);
        assert!(v["samples"]["1"].is_null());
        assert!(v["samples"]["2"]["data"].is_null());
        assert_eq!(v["patterns"][0].as_array().map(|a| a.len()), Some(4));
        assert_eq!(v["patterns"][0][0][0]["tone"], 0);
    }

    #[test]
    fn test_unpack_twice() {
        let dir = TempDir::new().unwrap();
        let ust = format::by_id("ust").unwrap();
        let m = ust.load(&Builder::new(ust).build()).unwrap();
        assert!(unpack(&m, "a.mod", dir.path()).is_ok());
        assert!(unpack(&m, "a.mod", dir.path()).is_ok());
    }

    #[test]
    fn test_wav_sample_values() {
        let dir = TempDir::new().unwrap();
        let ust = format::by_id("ust").unwrap();
        let b = Builder::new(ust)
            .sample(0, "x", 2, 64, 0, 1)
            .payload(0, &[0, 0x7f, 0x80, 0])
            .build();
        let m = ust.load(&b).unwrap();
        let project = unpack(&m, "x.mod", dir.path()).unwrap();

        let mut reader = hound::WavReader::open(project.sample_path.join("01 x.wav")).unwrap();
        let v: Vec<i8> = reader.samples::<i8>().map(|x| x.unwrap()).collect();
        assert_eq!(v, vec![0, 127, -128, 0]);
    }
}
