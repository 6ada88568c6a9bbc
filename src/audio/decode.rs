use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AssessError;
use crate::types::AudioData;

/// File extensions accepted by [`load_audio`].
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["wav", "flac", "ogg", "mp3", "m4a", "mp4", "aac"];

/// Decode an audio file into mono samples.
///
/// WAV, FLAC and Ogg Vorbis go through their dedicated decoders; everything
/// else is probed by symphonia.
pub fn load_audio(path: &Path) -> Result<AudioData, AssessError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AssessError::UnsupportedFormat(if ext.is_empty() {
            path.display().to_string()
        } else {
            ext
        }));
    }

    let (interleaved, sample_rate, channels) = match ext.as_str() {
        "wav" => decode_wav(path)?,
        "flac" => decode_flac(path)?,
        "ogg" => decode_ogg(path)?,
        _ => decode_symphonia(path, &ext)?,
    };

    if sample_rate == 0 {
        return Err(AssessError::invalid_input(format!(
            "'{}' reports a sample rate of 0",
            path.display()
        )));
    }
    if channels == 0 {
        return Err(AssessError::invalid_input(format!(
            "'{}' has zero channels",
            path.display()
        )));
    }

    let samples = downmix(&interleaved, channels as usize);
    let duration_secs = samples.len() as f64 / sample_rate as f64;
    log::info!(
        "decoded {}: {} Hz, {} ch, {:.2}s",
        path.display(),
        sample_rate,
        channels,
        duration_secs
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        duration_secs,
    })
}

/// Average interleaved channels into one.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn int_scale(bits_per_sample: u32) -> f32 {
    if bits_per_sample > 1 {
        ((1_i64 << (bits_per_sample - 1)) - 1) as f32
    } else {
        1.0
    }
}

fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32, u32), AssessError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| AssessError::decode("WAV", e))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AssessError::decode("WAV", e))?,
        hound::SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample as u32);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| AssessError::decode("WAV", e))?
        }
    };

    Ok((samples, spec.sample_rate, spec.channels as u32))
}

fn decode_flac(path: &Path) -> Result<(Vec<f32>, u32, u32), AssessError> {
    let mut reader =
        claxon::FlacReader::open(path).map_err(|e| AssessError::decode("FLAC", e))?;
    let info = reader.streaminfo();
    let scale = int_scale(info.bits_per_sample);

    let mut samples = Vec::new();
    for sample in reader.samples() {
        let sample = sample.map_err(|e| AssessError::decode("FLAC", e))?;
        samples.push(sample as f32 / scale);
    }
    Ok((samples, info.sample_rate, info.channels))
}

fn decode_ogg(path: &Path) -> Result<(Vec<f32>, u32, u32), AssessError> {
    let file = File::open(path).map_err(|e| AssessError::io("opening Ogg file", e))?;
    let mut reader = lewton::inside_ogg::OggStreamReader::new(BufReader::new(file))
        .map_err(|e| AssessError::decode("Ogg Vorbis", e))?;
    let sample_rate = reader.ident_hdr.audio_sample_rate;
    let channels = reader.ident_hdr.audio_channels as u32;

    let mut samples = Vec::new();
    while let Some(packet) = reader
        .read_dec_packet_itl()
        .map_err(|e| AssessError::decode("Ogg Vorbis", e))?
    {
        samples.extend(packet.iter().map(|&s| s as f32 / 32768.0));
    }
    Ok((samples, sample_rate, channels))
}

fn decode_symphonia(path: &Path, ext: &str) -> Result<(Vec<f32>, u32, u32), AssessError> {
    let file = File::open(path).map_err(|e| AssessError::io("opening audio file", e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(ext);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AssessError::decode("compressed", e))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AssessError::decode("compressed", "no decodable audio track"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u32)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AssessError::decode("compressed", e))?;

    let mut samples = Vec::new();
    let mut buf: Option<SampleBuffer<f32>> = None;
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AssessError::decode("compressed", e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("skipping corrupt packet in {}: {}", path.display(), e);
                continue;
            }
            Err(e) => return Err(AssessError::decode("compressed", e)),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u32;

        let needed = decoded.capacity() * spec.channels.count();
        if buf.as_ref().map_or(true, |b| b.capacity() < needed) {
            buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        if let Some(sample_buf) = buf.as_mut() {
            sample_buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(sample_buf.samples());
        }
    }

    Ok((samples, sample_rate, channels))
}
