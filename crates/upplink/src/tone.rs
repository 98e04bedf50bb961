//! Minimal alarm tone synthesis
//!
//! Renders a sine tone as a complete in-memory WAV file (16-bit mono PCM)
//! that an alarm sink can hand to whatever playback path it has. Kept as a
//! pure function so sinks without audio hardware can still use it (write to
//! disk, pipe to a player, discard).

/// Samples per second for rendered tones
pub const SAMPLE_RATE: u32 = 44_100;

/// Peak amplitude of the rendered sine, out of i16::MAX
pub const AMPLITUDE: i16 = 10_000;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Render a sine tone as a RIFF/WAVE byte buffer.
///
/// The caller loops playback for a continuous alarm; one second at 800 Hz is
/// the conventional fallback tone.
pub fn sine_wave_wav(frequency_hz: f64, duration_ms: u32) -> Vec<u8> {
    let bytes_per_sample = u32::from(BITS_PER_SAMPLE / 8);
    let samples = (u64::from(SAMPLE_RATE) * u64::from(duration_ms) / 1000) as u32;
    let data_size = samples * u32::from(CHANNELS) * bytes_per_sample;
    let byte_rate = SAMPLE_RATE * u32::from(CHANNELS) * bytes_per_sample;
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt subchunk (PCM)
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data subchunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());

    let theta = 2.0 * std::f64::consts::PI * frequency_hz / f64::from(SAMPLE_RATE);
    for n in 0..samples {
        let sample = (f64::from(AMPLITUDE) * (theta * f64::from(n)).sin()) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riff_header_layout() {
        let wav = sine_wave_wav(800.0, 1000);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        // One second of 16-bit mono at 44.1 kHz
        let data_size = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert_eq!(data_size, SAMPLE_RATE * 2);
        assert_eq!(wav.len(), 44 + data_size as usize);

        // RIFF chunk size covers everything after its own 8 header bytes
        let riff_size = u32::from_le_bytes(wav[4..8].try_into().unwrap());
        assert_eq!(riff_size, 36 + data_size);
    }

    #[test]
    fn test_fmt_fields() {
        let wav = sine_wave_wav(440.0, 10);

        let audio_format = u16::from_le_bytes(wav[20..22].try_into().unwrap());
        let channels = u16::from_le_bytes(wav[22..24].try_into().unwrap());
        let sample_rate = u32::from_le_bytes(wav[24..28].try_into().unwrap());
        let byte_rate = u32::from_le_bytes(wav[28..32].try_into().unwrap());
        let block_align = u16::from_le_bytes(wav[32..34].try_into().unwrap());
        let bits = u16::from_le_bytes(wav[34..36].try_into().unwrap());

        assert_eq!(audio_format, 1); // PCM
        assert_eq!(channels, 1);
        assert_eq!(sample_rate, SAMPLE_RATE);
        assert_eq!(byte_rate, SAMPLE_RATE * 2);
        assert_eq!(block_align, 2);
        assert_eq!(bits, 16);
    }

    #[test]
    fn test_sine_starts_at_zero_and_stays_bounded() {
        let wav = sine_wave_wav(800.0, 100);
        let samples: Vec<i16> = wav[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();

        assert_eq!(samples[0], 0);
        assert!(samples.iter().all(|&s| s.abs() <= AMPLITUDE));
        // It actually oscillates
        assert!(samples.iter().any(|&s| s > AMPLITUDE / 2));
        assert!(samples.iter().any(|&s| s < -AMPLITUDE / 2));
    }
}
