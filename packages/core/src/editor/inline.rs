//! Operations on a leaf's text runs
//!
//! Offsets are character offsets into the leaf's concatenated text. Every
//! mutating function leaves the runs normalized: no empty runs and no two
//! neighbours with the same format.

use super::document::{TextFormat, TextRun};

pub fn text_len(runs: &[TextRun]) -> usize {
    runs.iter().map(TextRun::len).sum()
}

pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Ensure a run boundary at `offset`; returns the index of the first run
/// starting at or after it
fn split_at(runs: &mut Vec<TextRun>, offset: usize) -> usize {
    let mut position = 0;
    for index in 0..runs.len() {
        if offset == position {
            return index;
        }
        let len = runs[index].len();
        if offset < position + len {
            let byte = byte_index(&runs[index].text, offset - position);
            let tail = runs[index].text.split_off(byte);
            let format = runs[index].format;
            runs.insert(index + 1, TextRun::formatted(tail, format));
            return index + 1;
        }
        position += len;
    }
    runs.len()
}

pub fn normalize(runs: &mut Vec<TextRun>) {
    runs.retain(|run| !run.is_empty());
    let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        match merged.last_mut() {
            Some(last) if last.format == run.format => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    *runs = merged;
}

/// Format a character typed at `offset` picks up
pub fn format_at(runs: &[TextRun], offset: usize) -> TextFormat {
    if offset == 0 {
        return runs.first().map(|run| run.format).unwrap_or_default();
    }
    let mut position = 0;
    for run in runs {
        position += run.len();
        if offset <= position {
            return run.format;
        }
    }
    runs.last().map(|run| run.format).unwrap_or_default()
}

pub fn insert(runs: &mut Vec<TextRun>, offset: usize, text: &str, format: TextFormat) {
    let offset = offset.min(text_len(runs));
    let index = split_at(runs, offset);
    runs.insert(index, TextRun::formatted(text, format));
    normalize(runs);
}

pub fn delete(runs: &mut Vec<TextRun>, start: usize, end: usize) {
    let len = text_len(runs);
    let (start, end) = (start.min(len), end.min(len));
    if start >= end {
        return;
    }
    let first = split_at(runs, start);
    let last = split_at(runs, end);
    runs.drain(first..last);
    normalize(runs);
}

/// Replace `start..end` with `text`, keeping the format of the replaced start
pub fn replace(runs: &mut Vec<TextRun>, start: usize, end: usize, text: &str) {
    let format = format_at(runs, start + 1);
    delete(runs, start, end);
    insert(runs, start, text, format);
}

/// Detach everything from `offset` on
pub fn split_off(runs: &mut Vec<TextRun>, offset: usize) -> Vec<TextRun> {
    let index = split_at(runs, offset);
    let mut tail = runs.split_off(index);
    normalize(runs);
    normalize(&mut tail);
    tail
}

/// Drop the first `count` characters
pub fn strip_prefix(runs: &mut Vec<TextRun>, count: usize) {
    delete(runs, 0, count);
}

/// True when every character in `start..end` carries `flag`
pub fn range_has_format(runs: &[TextRun], start: usize, end: usize, flag: TextFormat) -> bool {
    if start >= end {
        return false;
    }
    let mut position = 0;
    for run in runs {
        let run_end = position + run.len();
        if run_end > start && position < end && !run.format.contains(flag) {
            return false;
        }
        position = run_end;
    }
    true
}

pub fn set_format(runs: &mut Vec<TextRun>, start: usize, end: usize, flag: TextFormat, on: bool) {
    let len = text_len(runs);
    let (start, end) = (start.min(len), end.min(len));
    if start >= end {
        return;
    }
    let first = split_at(runs, start);
    let last = split_at(runs, end);
    for run in &mut runs[first..last] {
        run.format.set(flag, on);
    }
    normalize(runs);
}
