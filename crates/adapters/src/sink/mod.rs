pub mod tracing_sink;
