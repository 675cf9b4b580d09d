//! C FFI layer for embedding the renderer in native hosts.

use crate::content::{QuestionSolution, TopicLesson};
use crate::render::{ContentRenderer, HtmlConfig, MathBackend, TextMode};
use crate::segment::segment;
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::ptr;

/// Configuration for rendering.
#[repr(C)]
pub struct TutorConfig {
    /// Math backend: 0 = KaTeX, 1 = MathJax, 2 = MathML
    pub math_backend: c_int,
    /// Prose formatting: 0 = markdown, 1 = plain
    pub text_mode: c_int,
    /// Whether to generate standalone HTML (with DOCTYPE, head, etc.)
    pub standalone: c_int,
    /// CSS class prefix (null for the default)
    pub class_prefix: *const c_char,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            math_backend: 0,
            text_mode: 0,
            standalone: 0,
            class_prefix: ptr::null(),
        }
    }
}

/// Result type for FFI operations.
#[repr(C)]
pub struct TutorResult {
    /// Pointer to result string (caller must free with tutor_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with tutor_free_string)
    pub error: *mut c_char,
}

impl TutorResult {
    fn ok(data: String) -> Self {
        Self {
            data: into_c_string(data),
            error: ptr::null_mut(),
        }
    }

    fn err(error: impl ToString) -> Self {
        Self {
            data: ptr::null_mut(),
            error: into_c_string(error.to_string()),
        }
    }
}

/// Interior NULs cannot cross the boundary; they are dropped.
fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

unsafe fn read_str<'a>(input: *const c_char) -> Result<&'a str, TutorResult> {
    if input.is_null() {
        return Err(TutorResult::err("Null input pointer"));
    }
    CStr::from_ptr(input)
        .to_str()
        .map_err(|_| TutorResult::err("Invalid UTF-8 input"))
}

unsafe fn renderer_from(config: *const TutorConfig) -> ContentRenderer {
    if config.is_null() {
        return ContentRenderer::default();
    }

    let cfg = &*config;
    let mut html_config = HtmlConfig {
        math_backend: match cfg.math_backend {
            1 => MathBackend::MathJax,
            2 => MathBackend::MathML,
            _ => MathBackend::KaTeX,
        },
        text_mode: match cfg.text_mode {
            1 => TextMode::Plain,
            _ => TextMode::Markdown,
        },
        standalone: cfg.standalone != 0,
        ..Default::default()
    };
    if !cfg.class_prefix.is_null() {
        if let Ok(prefix) = CStr::from_ptr(cfg.class_prefix).to_str() {
            html_config.class_prefix = prefix.to_string();
        }
    }

    ContentRenderer::new(html_config)
}

/// Render a content string to HTML.
///
/// A null `input` renders like absent content: an empty string.
///
/// # Safety
///
/// - `input` must be null or a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to TutorConfig.
/// - The returned result must be freed with `tutor_free_result`.
#[no_mangle]
pub unsafe extern "C" fn tutor_render(
    input: *const c_char,
    config: *const TutorConfig,
) -> TutorResult {
    let content = if input.is_null() {
        None
    } else {
        match read_str(input) {
            Ok(s) => Some(s),
            Err(e) => return e,
        }
    };

    TutorResult::ok(renderer_from(config).render(content))
}

/// Segment a content string and return the segments as JSON.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - The returned result must be freed with `tutor_free_result`.
#[no_mangle]
pub unsafe extern "C" fn tutor_segment_json(input: *const c_char) -> TutorResult {
    let input = match read_str(input) {
        Ok(s) => s,
        Err(e) => return e,
    };

    match serde_json::to_string(&segment(input)) {
        Ok(json) => TutorResult::ok(json),
        Err(e) => TutorResult::err(format!("Serialization error: {}", e)),
    }
}

/// Decode a solution payload and render it.
///
/// # Safety
///
/// - `json` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to TutorConfig.
/// - The returned result must be freed with `tutor_free_result`.
#[no_mangle]
pub unsafe extern "C" fn tutor_render_solution(
    json: *const c_char,
    config: *const TutorConfig,
) -> TutorResult {
    let json = match read_str(json) {
        Ok(s) => s,
        Err(e) => return e,
    };

    match QuestionSolution::from_json(json) {
        Ok(solution) => TutorResult::ok(solution.to_html(&renderer_from(config))),
        Err(e) => TutorResult::err(e),
    }
}

/// Decode a lesson payload and render it.
///
/// # Safety
///
/// - `json` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to TutorConfig.
/// - The returned result must be freed with `tutor_free_result`.
#[no_mangle]
pub unsafe extern "C" fn tutor_render_lesson(
    json: *const c_char,
    config: *const TutorConfig,
) -> TutorResult {
    let json = match read_str(json) {
        Ok(s) => s,
        Err(e) => return e,
    };

    match TopicLesson::from_json(json) {
        Ok(lesson) => TutorResult::ok(lesson.to_html(&renderer_from(config))),
        Err(e) => TutorResult::err(e),
    }
}

/// Free a string returned by tutor functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a tutor function, or null.
#[no_mangle]
pub unsafe extern "C" fn tutor_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid TutorResult.
#[no_mangle]
pub unsafe extern "C" fn tutor_free_result(result: TutorResult) {
    tutor_free_string(result.data);
    tutor_free_string(result.error);
}

/// Get the library version.
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn tutor_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(result: TutorResult) -> Result<String, String> {
        let out = if result.data.is_null() {
            Err(CStr::from_ptr(result.error).to_string_lossy().into_owned())
        } else {
            Ok(CStr::from_ptr(result.data).to_string_lossy().into_owned())
        };
        tutor_free_result(result);
        out
    }

    #[test]
    fn test_render_roundtrip() {
        let input = CString::new("Energy: $E = mc^2$").unwrap();
        let html = unsafe { take(tutor_render(input.as_ptr(), ptr::null())) }.unwrap();
        assert!(html.contains(r"\(E = mc^2\)"));
    }

    #[test]
    fn test_null_input_renders_empty() {
        let html = unsafe { take(tutor_render(ptr::null(), ptr::null())) }.unwrap();
        assert_eq!(html, "");
    }

    #[test]
    fn test_config_prefix() {
        let prefix = CString::new("x-").unwrap();
        let config = TutorConfig {
            class_prefix: prefix.as_ptr(),
            ..Default::default()
        };
        let input = CString::new("$$a$$").unwrap();
        let html = unsafe { take(tutor_render(input.as_ptr(), &config)) }.unwrap();
        assert!(html.contains("x-block-math"));
    }

    #[test]
    fn test_segment_json() {
        let input = CString::new("a $b$").unwrap();
        let json = unsafe { take(tutor_segment_json(input.as_ptr())) }.unwrap();
        assert!(json.contains(r#""type":"inline-math""#));
    }

    #[test]
    fn test_bad_payload_reports_error() {
        let input = CString::new("{}").unwrap();
        let err = unsafe { take(tutor_render_lesson(input.as_ptr(), ptr::null())) }.unwrap_err();
        assert!(err.contains("JSON"));
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(tutor_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
