//! 按旁白文本和音频时长生成逐词字幕时间轴。
//!
//! 不做声学对齐：每个词分到相同的时长（总时长 ÷ 词数）。下游渲染依赖这个
//! 输出格式，所以时间模型保持不变。

use crate::error::{Result, VideoError};
use serde::{Deserialize, Serialize};

/// 每个字幕块的词数
pub const BLOCK_SIZE: usize = 3;

/// 一个带时间的词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// 同屏显示的一组词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionBlock {
    pub words: Vec<TimedWord>,
}

/// 字幕样式（固定配置）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionStyle {
    pub active_color: String,
    pub inactive_color: String,
    pub position: String,
    pub font_weight: String,
    pub max_words: usize,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            active_color: "yellow".to_string(),
            inactive_color: "white".to_string(),
            position: "center".to_string(),
            font_weight: "bold".to_string(),
            max_words: BLOCK_SIZE,
        }
    }
}

/// 单个场景的字幕文件内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionDocument {
    pub scene_id: u32,
    pub audio_duration: f64,
    pub captions: Vec<CaptionBlock>,
    pub style: CaptionStyle,
}

impl CaptionDocument {
    pub fn word_count(&self) -> usize {
        self.captions.iter().map(|block| block.words.len()).sum()
    }

    pub fn words(&self) -> impl Iterator<Item = &TimedWord> {
        self.captions.iter().flat_map(|block| block.words.iter())
    }
}

/// 生成一个场景的字幕时间轴。
///
/// 旁白只保留字母、数字、空白和撇号，转大写后按空白切词。切词后为空时返回
/// [`VideoError::EmptyNarration`]；时长不是正数时返回 [`VideoError::InvalidDuration`]。
pub fn generate(narration: &str, audio_duration: f64, scene_id: u32) -> Result<CaptionDocument> {
    if !(audio_duration.is_finite() && audio_duration > 0.0) {
        return Err(VideoError::InvalidDuration {
            scene_id,
            duration: audio_duration,
        });
    }

    let words = normalize_words(narration);
    if words.is_empty() {
        return Err(VideoError::EmptyNarration { scene_id });
    }

    let count = words.len();
    let word_duration = audio_duration / count as f64;

    // 游标按下标直接计算，不做累加；最后一个词结束于总时长。只在输出时取两位小数
    let cursor_after = |i: usize| {
        if i + 1 == count {
            audio_duration
        } else {
            word_duration * (i + 1) as f64
        }
    };

    let timed: Vec<TimedWord> = words
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let start = if i == 0 { 0.0 } else { round2(cursor_after(i - 1)) };
            TimedWord {
                text,
                start,
                end: round2(cursor_after(i)),
            }
        })
        .collect();

    let captions = timed
        .chunks(BLOCK_SIZE)
        .map(|chunk| CaptionBlock {
            words: chunk.to_vec(),
        })
        .collect();

    Ok(CaptionDocument {
        scene_id,
        audio_duration,
        captions,
        style: CaptionStyle::default(),
    })
}

fn normalize_words(narration: &str) -> Vec<String> {
    let cleaned: String = narration
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'')
        .collect();

    cleaned
        .to_uppercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// 四舍五入到两位小数（远离零）
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(doc: &CaptionDocument) -> Vec<(f64, f64)> {
        doc.words().map(|w| (w.start, w.end)).collect()
    }

    #[test]
    fn five_words_over_five_seconds() {
        let doc = generate("The quick brown fox jumps", 5.0, 1).unwrap();

        assert_eq!(
            spans(&doc),
            vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0), (3.0, 4.0), (4.0, 5.0)]
        );
        let sizes: Vec<usize> = doc.captions.iter().map(|b| b.words.len()).collect();
        assert_eq!(sizes, vec![3, 2]);
        assert_eq!(doc.captions[0].words[0].text, "THE");
        assert_eq!(doc.audio_duration, 5.0);
        assert_eq!(doc.scene_id, 1);
    }

    #[test]
    fn strips_punctuation_and_keeps_apostrophes() {
        let doc = generate("  Don't stop, \"believing\"...  it's   over!", 4.0, 2).unwrap();
        let texts: Vec<&str> = doc.words().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["DON'T", "STOP", "BELIEVING", "IT'S", "OVER"]);
    }

    #[test]
    fn empty_narration_is_rejected() {
        for narration in ["", "   ", "?!... --", "\n\t"] {
            let err = generate(narration, 3.0, 7).unwrap_err();
            assert!(matches!(err, VideoError::EmptyNarration { scene_id: 7 }));
        }
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        for duration in [0.0, -2.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = generate("alpha beta", duration, 4).unwrap_err();
            assert!(matches!(err, VideoError::InvalidDuration { scene_id: 4, .. }));
        }
    }

    #[test]
    fn last_word_ends_at_rounded_duration_for_fine_durations() {
        // 三位小数的时长，逐个累加会在最后一个词上多或少 0.01
        for millis in 1..=20_000u32 {
            let duration = millis as f64 / 1000.0;
            for count in 1..=12 {
                let narration = vec!["word"; count].join(" ");
                let doc = generate(&narration, duration, 1).unwrap();
                let words: Vec<&TimedWord> = doc.words().collect();

                assert_eq!(words[0].start, 0.0);
                assert_eq!(
                    words[count - 1].end,
                    round2(duration),
                    "duration {} over {} words",
                    duration,
                    count
                );
                for pair in words.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
            }
        }
    }

    #[test]
    fn adjacent_words_share_boundaries() {
        let durations = [0.87, 1.0, 2.35, 3.07, 4.5, 7.33, 12.5, 19.99];
        for &duration in &durations {
            for count in 1..=40 {
                let narration = vec!["word"; count].join(" ");
                let doc = generate(&narration, duration, 1).unwrap();
                let words: Vec<&TimedWord> = doc.words().collect();

                assert_eq!(words.len(), count);
                assert_eq!(words[0].start, 0.0);
                assert_eq!(words[count - 1].end, round2(duration));
                for pair in words.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }

                let total: f64 = words.iter().map(|w| w.end - w.start).sum();
                assert!((total - duration).abs() <= 0.01 * count as f64);
            }
        }
    }

    #[test]
    fn blocks_partition_words_in_order() {
        for count in 1..=20 {
            let narration: Vec<String> = (0..count).map(|i| format!("w{}", i)).collect();
            let doc = generate(&narration.join(" "), 6.0, 1).unwrap();

            assert_eq!(doc.word_count(), count);
            let (last, full) = doc.captions.split_last().unwrap();
            assert!(full.iter().all(|b| b.words.len() == BLOCK_SIZE));
            assert!((1..=BLOCK_SIZE).contains(&last.words.len()));

            let texts: Vec<String> = doc.words().map(|w| w.text.clone()).collect();
            let expected: Vec<String> = narration.iter().map(|w| w.to_uppercase()).collect();
            assert_eq!(texts, expected);
        }
    }

    #[test]
    fn uneven_division_rounds_at_emission() {
        let doc = generate("one two three", 1.0, 3).unwrap();
        assert_eq!(spans(&doc), vec![(0.0, 0.33), (0.33, 0.67), (0.67, 1.0)]);
    }

    #[test]
    fn document_serializes_with_artifact_keys() {
        let doc = generate("hello world", 2.0, 5).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["scene_id"], 5);
        assert_eq!(value["audio_duration"], 2.0);
        assert_eq!(value["captions"][0]["words"][1]["text"], "WORLD");
        assert_eq!(value["captions"][0]["words"][1]["start"], 1.0);
        assert_eq!(value["style"]["active_color"], "yellow");
        assert_eq!(value["style"]["inactive_color"], "white");
        assert_eq!(value["style"]["position"], "center");
        assert_eq!(value["style"]["font_weight"], "bold");
        assert_eq!(value["style"]["max_words"], 3);
    }
}
