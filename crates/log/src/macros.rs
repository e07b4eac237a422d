//! Convenience macros

/// Build [`Metadata`](crate::Metadata) from `key = value` pairs
///
/// ```rust
/// use gateway_log::metadata;
///
/// let meta = metadata!(device = "sensor-7", rssi = -61);
/// assert_eq!(meta.len(), 2);
///
/// let meta = metadata!("topic/name" => "a/b");
/// assert_eq!(meta.len(), 1);
/// ```
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::Metadata::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {{
        $crate::Metadata::new()
            $(.with(stringify!($key), $value))+
    }};
    ($($key:literal => $value:expr),+ $(,)?) => {{
        $crate::Metadata::new()
            $(.with($key, $value))+
    }};
}

/// Time a block through a logger's performance channel
#[macro_export]
macro_rules! timed {
    ($logger:expr, $operation:expr, $body:expr) => {{
        let _timer = $logger.start_timer($operation);
        $body
    }};
}
