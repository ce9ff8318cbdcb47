//! Logging for the FRP crates
//!
//! The library crates log through the `log` facade. [`init_logging`] routes
//! those records into a `tracing` subscriber filtered by `RUST_LOG` or
//! `FRP_LOG`, and hands each event to an optional hook as a
//! [`FrpLogRecord`].

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_log::{LogTracer, NormalizeEvent};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

#[derive(Debug, Clone, Serialize)]
pub struct FrpLogRecord {
    pub ts: String,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<JsonValue>,
}

type LogHook = Arc<dyn Fn(&FrpLogRecord) + Send + Sync>;

static LOG_HOOK: OnceCell<LogHook> = OnceCell::new();

pub struct LoggingGuard {
    _guard: Option<DefaultGuard>,
}

#[derive(Clone, Debug)]
pub struct LoggingOptions {
    /// Filter used when neither `RUST_LOG` nor `FRP_LOG` is set
    pub default_filter: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
        }
    }
}

/// Install the hook that receives every record. Only the first call wins.
pub fn set_log_hook<F>(hook: F)
where
    F: Fn(&FrpLogRecord) + Send + Sync + 'static,
{
    let _ = LOG_HOOK.set(Arc::new(hook));
}

pub fn init_logging(opts: LoggingOptions) -> LoggingGuard {
    // Install LogTracer so log:: macros flow into tracing
    let _ = LogTracer::init();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("FRP_LOG"))
        .or_else(|_| EnvFilter::try_new(&opts.default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let build_subscriber = || {
        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(LogBridgeLayer)
    };

    let guard = match tracing::subscriber::set_global_default(build_subscriber()) {
        Ok(()) => None,
        Err(_) => Some(tracing::subscriber::set_default(build_subscriber())),
    };

    LoggingGuard { _guard: guard }
}

/// Run `f` inside an info-level span named after the operation
pub fn with_operation_span<T>(operation: &str, f: impl FnOnce() -> T) -> T {
    let span = tracing::info_span!("frp_operation", operation = %operation);
    let _enter = span.enter();
    f()
}

struct LogBridgeLayer;

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl<S> Layer<S> for LogBridgeLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let hook = match LOG_HOOK.get() {
            Some(h) => h,
            None => return,
        };

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        // Records from the log facade carry their real target only here
        let normalized = event.normalized_metadata();
        let meta = normalized.as_ref().unwrap_or_else(|| event.metadata());

        let record = FrpLogRecord {
            ts: now_rfc3339(),
            level: meta.level().to_string(),
            target: meta.target().to_string(),
            message: visitor.message.unwrap_or_else(|| meta.name().to_string()),
            span: ctx.lookup_current().map(|s| s.name().to_string()),
            fields: visitor
                .fields
                .filter(|obj| obj.as_object().map(|m| !m.is_empty()).unwrap_or(false)),
        };

        hook(&record);
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Option<JsonValue>,
}

impl JsonVisitor {
    fn insert(&mut self, name: &str, entry: JsonValue) {
        let obj = self
            .fields
            .get_or_insert_with(|| JsonValue::Object(Default::default()));
        if let JsonValue::Object(map) = obj {
            map.insert(name.to_string(), entry);
        }
    }
}

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else if !field.name().starts_with("log.") {
            self.insert(field.name(), JsonValue::String(text));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else if !field.name().starts_with("log.") {
            self.insert(field.name(), JsonValue::String(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn log_hook_receives_record() {
        let captured: Arc<Mutex<Vec<FrpLogRecord>>> = Arc::new(Mutex::new(Vec::new()));
        let hook = {
            let c = captured.clone();
            move |rec: &FrpLogRecord| {
                c.lock().unwrap().push(rec.clone());
            }
        };
        set_log_hook(hook);
        let _guard = init_logging(LoggingOptions {
            default_filter: "trace".to_string(),
        });

        with_operation_span("mixture", || tracing::info!(size = 3, "hello world"));

        let items = captured.lock().unwrap();
        let record = items
            .iter()
            .find(|r| r.message.contains("hello world"))
            .expect("record captured");
        assert_eq!(record.level, "INFO");
        assert_eq!(record.span.as_deref(), Some("frp_operation"));
        assert_eq!(
            record.fields.as_ref().and_then(|f| f.get("size")).and_then(|v| v.as_str()),
            Some("3")
        );

        let bridged = items.len();
        drop(items);
        log::warn!(target: "frp_kinds::kind", "bridged from log");
        let items = captured.lock().unwrap();
        let record = items[bridged..]
            .iter()
            .find(|r| r.message.contains("bridged from log"))
            .expect("log record captured");
        assert_eq!(record.target, "frp_kinds::kind");
        assert_eq!(record.level, "WARN");
    }
}
