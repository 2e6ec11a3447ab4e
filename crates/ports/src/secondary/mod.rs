pub mod access_log_sink;
