use futures_util::{Stream, StreamExt};

/// Incremental UTF-8 decoder for byte streams whose chunk boundaries do
/// not respect character boundaries. A multi-byte sequence split across
/// two chunks is held back until its remaining bytes arrive, then decoded
/// whole; genuinely invalid bytes become U+FFFD.
#[derive(Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the next chunk, returning the maximal text that is final
    /// at this point. Incomplete trailing bytes carry over to the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::new();
        let mut buf = std::mem::take(&mut self.pending);

        loop {
            match std::str::from_utf8(&buf) {
                Ok(s) => {
                    out.push_str(s);
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    // lossless here: the prefix below valid_up_to is well-formed
                    out.push_str(&String::from_utf8_lossy(&buf[..valid]));
                    match e.error_len() {
                        // Incomplete sequence at the tail: keep it for the next chunk.
                        None => {
                            self.pending = buf.split_off(valid);
                            return out;
                        }
                        // Invalid bytes in the middle: replace and keep going.
                        Some(len) => {
                            out.push('\u{FFFD}');
                            buf.drain(..valid + len);
                        }
                    }
                }
            }
        }
    }

    /// Flushes the decoder at end-of-stream. A dangling partial sequence
    /// means the stream was cut mid-character.
    pub fn finish(self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            "\u{FFFD}".to_string()
        }
    }
}

/// Drives a byte stream to completion, publishing one decoded fragment
/// per physical chunk, strictly in arrival order. On a mid-stream error
/// the fragments already published stay published and the error is
/// returned for the caller to surface. The stream is finite and cannot
/// be restarted.
pub async fn consume_text_stream<S, B, E>(mut stream: S, mut sink: impl FnMut(String)) -> Result<(), E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut decoder = Utf8StreamDecoder::new();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        sink(decoder.decode(chunk.as_ref()));
    }
    let tail = decoder.finish();
    if !tail.is_empty() {
        sink(tail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures_util::stream;

    #[test]
    fn ascii_passthrough() {
        let mut d = Utf8StreamDecoder::new();
        assert_eq!(d.decode(b"hello "), "hello ");
        assert_eq!(d.decode(b"world"), "world");
        assert_eq!(d.finish(), "");
    }

    #[test]
    fn cjk_split_at_every_offset() {
        // "注意力机制" = 15 bytes, 3 per character
        let text = "注意力机制";
        let bytes = text.as_bytes();
        for split in 0..=bytes.len() {
            let mut d = Utf8StreamDecoder::new();
            let mut out = d.decode(&bytes[..split]);
            out.push_str(&d.decode(&bytes[split..]));
            out.push_str(&d.finish());
            assert_eq!(out, text, "split at {}", split);
        }
    }

    #[test]
    fn four_byte_sequence_across_three_chunks() {
        let text = "a🦀b";
        let bytes = text.as_bytes();
        let mut d = Utf8StreamDecoder::new();
        let mut out = String::new();
        out.push_str(&d.decode(&bytes[..2])); // 'a' + first crab byte
        out.push_str(&d.decode(&bytes[2..4])); // middle crab bytes
        out.push_str(&d.decode(&bytes[4..])); // last crab byte + 'b'
        out.push_str(&d.finish());
        assert_eq!(out, text);
    }

    #[test]
    fn invalid_bytes_become_replacement_char() {
        let mut d = Utf8StreamDecoder::new();
        let out = d.decode(&[b'a', 0xff, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn truncated_tail_flushes_as_replacement() {
        let mut d = Utf8StreamDecoder::new();
        // first two bytes of a three-byte character
        assert_eq!(d.decode(&"注".as_bytes()[..2]), "");
        assert_eq!(d.finish(), "\u{FFFD}");
    }

    fn ok_chunks(chunks: Vec<&'static [u8]>) -> impl Stream<Item = Result<&'static [u8], String>> + Unpin {
        stream::iter(chunks.into_iter().map(Ok))
    }

    #[test]
    fn consumer_publishes_one_update_per_chunk_in_order() {
        let mut seen = Vec::new();
        let fut = consume_text_stream(
            ok_chunks(vec!["注意力".as_bytes(), "机制是一种...".as_bytes()]),
            |frag| seen.push(frag),
        );
        block_on(fut).unwrap();
        assert_eq!(seen, vec!["注意力".to_string(), "机制是一种...".to_string()]);
    }

    #[test]
    fn consumer_concatenation_equals_whole_text() {
        let text = "Attention 是 Transformer 的核心机制。🦀";
        let bytes = text.as_bytes();
        // every possible split into two chunks
        for split in 0..=bytes.len() {
            let chunks: Vec<Result<&[u8], String>> = vec![Ok(&bytes[..split]), Ok(&bytes[split..])];
            let mut acc = String::new();
            block_on(consume_text_stream(stream::iter(chunks), |f| acc.push_str(&f))).unwrap();
            assert_eq!(acc, text, "split at {}", split);
        }
    }

    #[test]
    fn consumer_keeps_partials_on_midstream_error() {
        let chunks: Vec<Result<&[u8], String>> = vec![
            Ok("部分".as_bytes()),
            Err("connection reset".to_string()),
            Ok("不会到达".as_bytes()),
        ];
        let mut acc = String::new();
        let err = block_on(consume_text_stream(stream::iter(chunks), |f| acc.push_str(&f)))
            .unwrap_err();
        assert_eq!(acc, "部分");
        assert_eq!(err, "connection reset");
    }
}
