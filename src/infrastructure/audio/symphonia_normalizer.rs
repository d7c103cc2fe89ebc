use std::io::Cursor;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioConversionError, AudioNormalizer};
use crate::domain::{CallRecording, NormalizedAudio};

/// In-process normalizer: symphonia decode, mono downmix, rubato resample,
/// 16-bit PCM WAV via hound. Needs no external binary and no disk space.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaAudioNormalizer;

#[async_trait]
impl AudioNormalizer for SymphoniaAudioNormalizer {
    async fn normalize(
        &self,
        recording: CallRecording,
    ) -> Result<NormalizedAudio, AudioConversionError> {
        if recording.is_empty() {
            return Err(AudioConversionError::EmptyInput);
        }

        let extension = recording.extension().map(str::to_string);
        let data = recording.data;

        tokio::task::spawn_blocking(move || {
            let samples = decode_to_mono_pcm(data, extension.as_deref())?;
            encode_wav(&samples).map(NormalizedAudio::from_wav_bytes)
        })
        .await
        .map_err(|e| AudioConversionError::DecodingFailed(format!("decoder task: {}", e)))?
    }
}

fn decode_to_mono_pcm(
    data: Vec<u8>,
    extension: Option<&str>,
) -> Result<Vec<f32>, AudioConversionError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioConversionError::DecodingFailed(format!("probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| AudioConversionError::DecodingFailed("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| AudioConversionError::DecodingFailed("unknown sample rate".to_string()))?;
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1).max(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AudioConversionError::DecodingFailed(format!("codec: {}", e)))?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(AudioConversionError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(AudioConversionError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let mut sample_buf = SampleBuffer::<f32>::new(frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let frame_width = spec.channels.count().max(1);

        if frame_width > 1 {
            mono.extend(
                sample_buf
                    .samples()
                    .chunks(frame_width)
                    .map(|frame| frame.iter().sum::<f32>() / frame_width as f32),
            );
        } else {
            mono.extend_from_slice(sample_buf.samples());
        }
    }

    if mono.is_empty() {
        return Err(AudioConversionError::DecodingFailed(
            "no audio samples decoded".to_string(),
        ));
    }

    if source_rate != NormalizedAudio::SAMPLE_RATE {
        mono = resample(&mono, source_rate, NormalizedAudio::SAMPLE_RATE)?;
    }

    tracing::debug!(
        source_rate,
        source_channels = channels,
        samples = mono.len(),
        duration_secs = mono.len() as f32 / NormalizedAudio::SAMPLE_RATE as f32,
        "Audio decoded to 16kHz mono PCM"
    );

    Ok(mono)
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioConversionError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| AudioConversionError::DecodingFailed(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let mut input = chunk.to_vec();
        input.resize(chunk_size, 0.0);

        let result = resampler
            .process(&[input], None)
            .map_err(|e| AudioConversionError::DecodingFailed(format!("resample: {}", e)))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}

fn encode_wav(samples: &[f32]) -> Result<Vec<u8>, AudioConversionError> {
    let spec = hound::WavSpec {
        channels: NormalizedAudio::CHANNELS,
        sample_rate: NormalizedAudio::SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| AudioConversionError::EncodingFailed(e.to_string()))?;
        for &sample in samples {
            let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(pcm)
                .map_err(|e| AudioConversionError::EncodingFailed(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioConversionError::EncodingFailed(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
