//! Pretty-printing: a bit dump of the payload bytes and a labeled field summary.
//! Neither is used for parsing; both are purely diagnostic and must never panic.

use super::Frame;
use std::fmt::Write as _;

fn counter_width(total_rows: usize) -> (bool, usize) {
    if total_rows < 10_000 {
        (false, 4)
    } else if total_rows <= 0xFFFF {
        (true, 4)
    } else if total_rows <= 0xFFFF_FFFF {
        (true, 8)
    } else {
        (true, 16)
    }
}

/// Render `data` as a row-counted, ASCII-bordered dump of 8-bit binary groups, four
/// bytes per row, enclosed top and bottom by a `+---+---+` rule so each row reads as
/// a bordered table rather than a bare left gutter.
pub(crate) fn bit_dump(data: &[u8]) -> String {
    const GROUPS_PER_ROW: usize = 4;
    const GROUP_WIDTH: usize = 8; // "01001000"

    let total_rows = data.len().div_ceil(GROUPS_PER_ROW).max(1);
    let (hex, counter_width) = counter_width(total_rows);

    let counter_col_width = counter_width + 2;
    let body_col_width = GROUPS_PER_ROW * (GROUP_WIDTH + 1) - 1 + 2;
    let border = format!("+{}+{}+", "-".repeat(counter_col_width), "-".repeat(body_col_width));

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');

    for row in 0..total_rows {
        let counter = if hex {
            format!("{row:0counter_width$x}")
        } else {
            format!("{row:0counter_width$}")
        };
        let mut body = String::new();
        for col in 0..GROUPS_PER_ROW {
            if col > 0 {
                body.push(' ');
            }
            let idx = row * GROUPS_PER_ROW + col;
            if idx < data.len() {
                let _ = write!(body, "{:08b}", data[idx]);
            } else {
                body.push_str(&" ".repeat(GROUP_WIDTH));
            }
        }
        let _ = writeln!(out, "| {counter} | {body} |");
    }

    out.push_str(&border);
    out.push('\n');
    out
}

fn render_payload(frame: &Frame) -> String {
    let payload = frame.payload();
    if payload.is_empty() {
        return String::new();
    }
    if payload.len() > 125 {
        return "---".to_string();
    }
    let eligible = frame.fin().is_final()
        && frame.masked() == crate::bits::MaskBit::Unmasked
        && !frame.rsv1().is_set()
        && frame.opcode() == crate::protocol::opcode::OpCode::Text;
    if eligible {
        if let Ok(text) = std::str::from_utf8(payload) {
            return text.to_string();
        }
    }
    payload.iter().map(|b| format!("{b:02x}")).collect()
}

/// Render a labeled summary of `frame`'s fields.
pub(crate) fn summary(frame: &Frame) -> String {
    let extended = if frame.payload_length_7() >= 126 {
        frame.exact_payload_length().to_string()
    } else {
        String::new()
    };
    let key = frame
        .masking_key()
        .map(|k| k.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(":"))
        .unwrap_or_default();

    format!(
        "<FRAME>\n\
         fin: {}\n\
         rsv: {} {} {}\n\
         opcode: {}\n\
         mask: {}\n\
         payload length: {}\n\
         extended payload length: {}\n\
         masking key: {}\n\
         payload: {}\n",
        frame.fin(),
        frame.rsv1(),
        frame.rsv2(),
        frame.rsv3(),
        frame.opcode(),
        frame.masked(),
        frame.payload_length_7(),
        extended,
        key,
        render_payload(frame),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::opcode::OpCode;

    #[test]
    fn test_summary_falls_back_to_hex_on_invalid_utf8() {
        let frame = Frame::new(OpCode::Text, vec![0xff, 0xfe], false, false).unwrap();
        // Eligible for UTF-8 decoding (final, unmasked, uncompressed text), but the
        // bytes aren't valid UTF-8, so this must fall back to hex rather than panic.
        let s = summary(&frame);
        assert!(s.contains("payload: fffe"));
    }

    #[test]
    fn test_summary_empty_payload() {
        let frame = Frame::ping(vec![]).unwrap();
        let s = summary(&frame);
        assert!(s.contains("payload: \n"));
    }

    #[test]
    fn test_summary_long_payload_truncated() {
        let frame = Frame::binary(vec![0xAA; 200]).unwrap();
        let s = summary(&frame);
        assert!(s.contains("payload: ---"));
    }

    #[test]
    fn test_summary_decodes_text_frame() {
        let frame = Frame::text("hi").unwrap();
        let s = summary(&frame);
        assert!(s.contains("payload: hi"));
    }

    #[test]
    fn test_bit_dump_handles_empty() {
        let dump = bit_dump(&[]);
        // must not panic and must still produce one (blank) row's border
        assert!(dump.contains('|'));
    }

    #[test]
    fn test_bit_dump_partial_final_row() {
        let dump = bit_dump(&[0xFF, 0x00]);
        assert!(dump.contains("11111111"));
        assert!(dump.contains("00000000"));
    }

    #[test]
    fn test_bit_dump_is_fully_bordered() {
        let dump = bit_dump(&[0xAB; 10]);
        let lines: Vec<&str> = dump.lines().collect();
        // top and bottom rule, plus one line per row, enclose the table on all sides.
        let top = lines.first().unwrap();
        let bottom = lines.last().unwrap();
        assert!(top.starts_with('+') && top.ends_with('+'));
        assert_eq!(top, bottom);
        for row_line in &lines[1..lines.len() - 1] {
            assert!(row_line.starts_with('|') && row_line.ends_with('|'));
        }
    }
}
