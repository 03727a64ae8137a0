use std::backtrace::Backtrace;
use std::io::stderr;
use std::io::Write;
use std::panic;
use std::process;

pub(crate) fn set_up_panic_hook() {
  // A panic in any worker task means a delivery invariant was broken, and tokio would otherwise swallow it and keep the other workers running. Exit the whole process instead.
  panic::set_hook(Box::new(move |panic_info| {
    let bt = Backtrace::force_capture();
    // Don't use `tracing::*` from within a panic handler, it could itself panic.
    // Build the string first so it (hopefully) lands in one write syscall, prefixed with a newline to avoid mangling a half-written line.
    let json = format!(
      "\r\n{}\r\n",
      serde_json::json!({
        "level": "CRITICAL",
        "panic": true,
        "message": panic_info.to_string(),
        "stack_trace": bt.to_string(),
      })
    );
    let mut out = stderr();
    let _ = out.write_all(json.as_bytes());
    let _ = out.flush();
    process::exit(1);
  }));
}
