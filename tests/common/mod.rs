/*!
 * Common test utilities for the dualsub test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use dualsub::generation::timing::MIN_CUE_LENGTH;
use dualsub::Cue;

/// Slack for floating point time comparisons
pub const TIME_EPSILON: f64 = 1e-9;

/// Eight sentence English lesson transcript
pub const LESSON_EN: &str = "Welcome to the first lesson of this course. \
Today we will set up the development environment. \
First, download the installer from the official website and run it. \
When the installer asks for a location, keep the default folder. \
Next, open a terminal window. Type the version command and press enter. \
If you see a version number, the installation worked. \
That is all for this lesson, see you in the next one.";

/// Vietnamese translation of `LESSON_EN`, sentence for sentence
pub const LESSON_VI: &str = "Chào mừng bạn đến với bài học đầu tiên của khóa học. \
Hôm nay chúng ta sẽ cài đặt môi trường phát triển. \
Đầu tiên, tải trình cài đặt từ trang web chính thức và chạy nó. \
Khi trình cài đặt hỏi vị trí, hãy giữ thư mục mặc định. \
Tiếp theo, mở một cửa sổ dòng lệnh. Gõ lệnh phiên bản và nhấn enter. \
Nếu bạn thấy số phiên bản, việc cài đặt đã thành công. \
Đó là tất cả cho bài học này, hẹn gặp lại bạn ở bài sau.";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes the lesson transcripts and returns (source, target) paths
pub fn create_lesson_transcripts(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let source = create_test_file(dir, "lesson.en.txt", LESSON_EN)?;
    let target = create_test_file(dir, "lesson.vi.txt", LESSON_VI)?;
    Ok((source, target))
}

/// Creates a sample bilingual SRT file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.
<i>Đây là phụ đề thử nghiệm.</i>

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.
<i>Nó có nhiều mục.</i>

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
<i>Dùng để thử nghiệm.</i>
"#;
    create_test_file(dir, filename, content)
}

/// Asserts the layout guarantees every generated cue list must hold:
/// positive length, no overlap, starts at or after zero, and (for a known
/// video length) the last cue ends no later than the video.
pub fn assert_cue_layout(cues: &[Cue], video_duration: f64) {
    for (i, cue) in cues.iter().enumerate() {
        assert!(cue.start >= 0.0, "cue {} starts before zero: {:?}", i + 1, cue);
        assert!(
            cue.end - cue.start >= MIN_CUE_LENGTH - TIME_EPSILON,
            "cue {} is shorter than the minimum length: {:?}",
            i + 1,
            cue
        );
    }

    for (i, pair) in cues.windows(2).enumerate() {
        assert!(
            pair[1].start >= pair[0].end - TIME_EPSILON,
            "cue {} overlaps cue {}: {:?} / {:?}",
            i + 2,
            i + 1,
            pair[0],
            pair[1]
        );
    }

    if video_duration > 0.0 {
        if let Some(last) = cues.last() {
            assert!(
                last.end <= video_duration + TIME_EPSILON,
                "last cue ends at {} after the video ends at {}",
                last.end,
                video_duration
            );
        }
    }
}
