use std::io::Cursor;

use anyhow::Context;

/// Sample rate of the narration returned by the speech model.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Little-endian 16-bit PCM bytes to samples. A trailing odd byte is dropped.
pub fn pcm_from_le_bytes(raw: &[u8]) -> Vec<i16> {
    raw.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Wraps mono 16-bit samples in a WAV container.
pub fn wav_from_pcm(samples: &[i16], sample_rate: u32) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).context("start wav")?;
        for s in samples {
            writer.write_sample(*s).context("write wav sample")?;
        }
        writer.finalize().context("finalize wav")?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod audio_tests {
    use super::*;

    #[test]
    fn decodes_little_endian_pairs() {
        assert_eq!(pcm_from_le_bytes(&[0x01, 0x00, 0xff, 0x7f, 0x09]), vec![1, i16::MAX]);
    }

    #[test]
    fn wav_round_trips_through_hound() {
        let samples = vec![0i16, 100, -100, i16::MIN];
        let wav = wav_from_pcm(&samples, SPEECH_SAMPLE_RATE).unwrap();
        assert_eq!(&wav[..4], b"RIFF");

        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, SPEECH_SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);
        let back: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(back, samples);
    }
}
