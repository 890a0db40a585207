//! FFI bindings for Handform
//!
//! This module provides C-compatible functions for calling Handform from other
//! languages (game engines, mobile camera pipelines). All functions use C
//! strings (null-terminated) and return allocated memory that must be freed by
//! the caller using `handform_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EvaluatorConfig;
use crate::error::ComputeError;
use crate::exercise::ExerciseDescriptor;
use crate::pipeline::{evaluate_json, Evaluator};
use crate::types::Landmark;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read both request strings, recording which pointer was bad
unsafe fn read_request(
    landmarks: *const c_char,
    exercise: *const c_char,
) -> Option<(String, String)> {
    let Some(landmarks) = cstr_to_string(landmarks) else {
        set_last_error("Invalid landmarks string pointer");
        return None;
    };
    let Some(exercise) = cstr_to_string(exercise) else {
        set_last_error("Invalid exercise string pointer");
        return None;
    };
    Some((landmarks, exercise))
}

fn boundaries_json(
    evaluator: &Evaluator,
    landmarks_json: &str,
    exercise_json: &str,
) -> Result<String, ComputeError> {
    let landmarks: Vec<Landmark> = serde_json::from_str(landmarks_json)
        .map_err(|e| ComputeError::InvalidInput(format!("landmarks: {e}")))?;
    let exercise = ExerciseDescriptor::from_json(exercise_json)?;
    let boundaries = evaluator.boundaries_for(&landmarks, &exercise)?;
    Ok(serde_json::to_string(&boundaries)?)
}

// ============================================================================
// Stateless API
// ============================================================================

/// Evaluate a landmark array against an exercise descriptor.
///
/// Invalid landmarks or descriptors still produce a JSON result carrying an
/// `error` tag; NULL is only returned for bad pointers.
///
/// # Safety
/// - `landmarks` and `exercise` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `handform_free_string`.
/// - Returns NULL on error; call `handform_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn handform_evaluate_json(
    landmarks: *const c_char,
    exercise: *const c_char,
) -> *mut c_char {
    clear_last_error();

    match read_request(landmarks, exercise) {
        Some((landmarks, exercise)) => string_to_cstr(&evaluate_json(&landmarks, &exercise)),
        None => ptr::null_mut(),
    }
}

/// Return the boundary lines the exercise would be judged against.
///
/// # Safety
/// - `landmarks` and `exercise` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `handform_free_string`.
/// - Returns NULL on error; call `handform_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn handform_boundaries_json(
    landmarks: *const c_char,
    exercise: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some((landmarks, exercise)) = read_request(landmarks, exercise) else {
        return ptr::null_mut();
    };

    match boundaries_json(&Evaluator::new(), &landmarks, &exercise) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Evaluator API
// ============================================================================

/// Opaque handle to a configured Evaluator
pub struct HandformEvaluatorHandle {
    evaluator: Evaluator,
}

/// Create an evaluator from a JSON configuration.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string, or NULL for defaults.
/// - Must be freed with `handform_evaluator_free`.
/// - Returns NULL on an invalid configuration.
#[no_mangle]
pub unsafe extern "C" fn handform_evaluator_new(
    config_json: *const c_char,
) -> *mut HandformEvaluatorHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        Ok(EvaluatorConfig::default())
    } else {
        match cstr_to_string(config_json) {
            Some(json) => EvaluatorConfig::from_json(&json),
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        }
    };

    match config.and_then(Evaluator::with_config) {
        Ok(evaluator) => Box::into_raw(Box::new(HandformEvaluatorHandle { evaluator })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free an evaluator.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `handform_evaluator_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn handform_evaluator_free(evaluator: *mut HandformEvaluatorHandle) {
    if !evaluator.is_null() {
        drop(Box::from_raw(evaluator));
    }
}

/// Evaluate with a configured evaluator.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `handform_evaluator_new`.
/// - `landmarks` and `exercise` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `handform_free_string`.
/// - Returns NULL on error; call `handform_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn handform_evaluator_evaluate(
    evaluator: *const HandformEvaluatorHandle,
    landmarks: *const c_char,
    exercise: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if evaluator.is_null() {
        set_last_error("Null evaluator pointer");
        return ptr::null_mut();
    }
    let handle = &*evaluator;

    match read_request(landmarks, exercise) {
        Some((landmarks, exercise)) => {
            string_to_cstr(&handle.evaluator.evaluate_json(&landmarks, &exercise))
        }
        None => ptr::null_mut(),
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Handform functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Handform function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn handform_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Handform function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn handform_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Handform library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn handform_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
