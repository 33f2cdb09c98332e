use cached::proc_macro::cached;
use opentelemetry::KeyValue;

pub fn set(name: &'static str, value: f64, kv: &[(&str, &str)]) {
    let kv: Vec<KeyValue> = kv.iter().map(|(k, v)| as_kv(k, v)).collect();
    gauge(name).record(value, &kv)
}

fn as_kv(k: &str, v: &str) -> KeyValue {
    KeyValue::new(k.to_owned(), v.to_owned())
}

#[cached]
fn gauge(name: &'static str) -> opentelemetry::metrics::Gauge<f64> {
    opentelemetry::global::meter("pellet_estimator").f64_gauge(name).build()
}
