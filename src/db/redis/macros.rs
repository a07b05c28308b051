/// A macro to wrap a fallible fetch in the optional Redis freshness window.
///
/// If a cache is configured and holds a fresh value for the key, that value is
/// returned without running the block. Otherwise the block runs, and a
/// successful result is queued for a background write with the given TTL.
///
/// The cache is best-effort: read failures are logged and treated as a miss,
/// and the background write never blocks or fails the caller.
///
/// # Arguments
/// * `$cache`: An `Option<&Cache>`; `None` disables caching.
/// * `$key`: The `CacheKey` for the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache.as_ref(), CacheKey::Search(query), 300, async {
///     fetch_from_api(query).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;

        let hit = match cache {
            Some(cache) => cache.lookup(&key).await,
            None => None,
        };

        if let Some(hit) = hit {
            tracing::debug!(key = %key, "Cache hit");
            Ok(hit)
        } else {
            let value = $block.await?;
            if let Some(cache) = cache {
                cache.set_in_background(&key, &value, $ttl);
            }
            Ok(value)
        }
    }};
}
