//! Frame-by-frame filtering of raw I420 streams

use std::io::{ErrorKind, Read, Write};

use anyhow::{bail, Context, Result};
use rtc_sepia_core::data::{I420Buffer, PixelFormat};
use rtc_sepia_core::SepiaFilter;

/// Fill `buf` from `reader`, stopping early only at end of stream.
/// Returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Filter every tightly packed `width`x`height` I420 frame in `reader` into
/// `writer`. Returns the number of frames written.
pub fn process_stream(
    reader: &mut impl Read,
    writer: &mut impl Write,
    filter: &SepiaFilter,
    width: u32,
    height: u32,
) -> Result<u64> {
    let frame_size = PixelFormat::I420.buffer_size(width, height);
    if frame_size == 0 {
        bail!("Frame dimensions must be positive, got {}x{}", width, height);
    }

    let mut packed = vec![0u8; frame_size];
    let mut frames = 0u64;
    loop {
        let n = read_full(reader, &mut packed)
            .with_context(|| format!("Failed to read frame {}", frames))?;
        if n == 0 {
            break;
        }
        if n < frame_size {
            bail!(
                "Trailing partial frame: {} of {} bytes after {} complete frames",
                n,
                frame_size,
                frames
            );
        }

        let mut frame = I420Buffer::from_packed(&packed, width, height)?;
        filter
            .apply(&mut frame.as_planar_mut())
            .with_context(|| format!("Failed to filter frame {}", frames))?;
        writer
            .write_all(&frame.to_packed())
            .with_context(|| format!("Failed to write frame {}", frames))?;

        frames += 1;
        tracing::trace!("Filtered frame {}", frames);
    }

    writer.flush().context("Failed to flush output")?;
    Ok(frames)
}
