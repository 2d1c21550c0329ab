//! Redis-backed store

use std::collections::HashMap;

use ::redis::{aio::ConnectionManager, AsyncCommands, Client, Script};
use async_trait::async_trait;

use super::{BoundedWrite, CounterOutcome, KvStore};
use crate::error::{AppError, AppResult};

const COMPARE_AND_SET: &str = r#"
if redis.call('HGET', KEYS[1], ARGV[1]) == ARGV[2] then
  redis.call('HSET', KEYS[1], ARGV[1], ARGV[3])
  return 1
end
return 0
"#;

// Replies are {status, from, to}; status 0 = missing, 1 = exhausted, 2 = changed
const TAKE_UNIT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then return {0, 0, 0} end
local current = tonumber(redis.call('HGET', KEYS[1], ARGV[1]) or '0') or 0
if current <= 0 then return {1, current, current} end
redis.call('HSET', KEYS[1], ARGV[1], current - 1)
return {2, current, current - 1}
"#;

const RESTORE_UNIT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then return {0, 0, 0} end
local current = tonumber(redis.call('HGET', KEYS[1], ARGV[1]) or '0') or 0
local cap = tonumber(redis.call('HGET', KEYS[1], ARGV[2]) or '0') or 0
local updated = math.max(math.min(current + 1, cap), 0)
redis.call('HSET', KEYS[1], ARGV[1], updated)
return {2, current, updated}
"#;

// ARGV = field, cap_field, then field/value pairs; -1 missing, 0 rejected, 1 written
const SET_BOUNDED: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then return -1 end
local current = tonumber(redis.call('HGET', KEYS[1], ARGV[1]) or '0') or 0
local cap = tonumber(redis.call('HGET', KEYS[1], ARGV[2]) or '0') or 0
for i = 3, #ARGV, 2 do
  if ARGV[i] == ARGV[1] then current = tonumber(ARGV[i + 1]) or 0 end
  if ARGV[i] == ARGV[2] then cap = tonumber(ARGV[i + 1]) or 0 end
end
if current > cap then return 0 end
for i = 3, #ARGV, 2 do
  redis.call('HSET', KEYS[1], ARGV[i], ARGV[i + 1])
end
return 1
"#;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    compare_and_set: Script,
    take_unit: Script,
    restore_unit: Script,
    set_bounded: Script,
}

impl RedisStore {
    /// Connect to Redis and check the connection
    pub async fn connect(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        let store = Self {
            conn,
            compare_and_set: Script::new(COMPARE_AND_SET),
            take_unit: Script::new(TAKE_UNIT),
            restore_unit: Script::new(RESTORE_UNIT),
            set_bounded: Script::new(SET_BOUNDED),
        };

        store
            .ping()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(store)
    }

    fn outcome(reply: (i64, i64, i64)) -> CounterOutcome {
        match reply {
            (0, _, _) => CounterOutcome::Missing,
            (1, _, _) => CounterOutcome::Exhausted,
            (_, from, to) => CounterOutcome::Changed { from, to },
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        ::redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hgetall(key).await?)
    }

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> AppResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.hset_multiple::<_, _, _, ()>(key, &fields).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        Ok(conn.exists(key).await?)
    }

    async fn sadd(&self, set: &str, member: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(set, member).await?;
        Ok(())
    }

    async fn srem(&self, set: &str, member: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(set, member).await?;
        Ok(())
    }

    async fn smembers(&self, set: &str) -> AppResult<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.smembers(set).await?)
    }

    async fn hcompare_and_set(
        &self,
        key: &str,
        field: &str,
        expected: &str,
        new: &str,
    ) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let swapped: i64 = self
            .compare_and_set
            .key(key)
            .arg(field)
            .arg(expected)
            .arg(new)
            .invoke_async(&mut conn)
            .await?;
        Ok(swapped == 1)
    }

    async fn htake_unit(&self, key: &str, field: &str) -> AppResult<CounterOutcome> {
        let mut conn = self.conn.clone();
        let reply: (i64, i64, i64) = self
            .take_unit
            .key(key)
            .arg(field)
            .invoke_async(&mut conn)
            .await?;
        Ok(Self::outcome(reply))
    }

    async fn hrestore_unit(
        &self,
        key: &str,
        field: &str,
        cap_field: &str,
    ) -> AppResult<CounterOutcome> {
        let mut conn = self.conn.clone();
        let reply: (i64, i64, i64) = self
            .restore_unit
            .key(key)
            .arg(field)
            .arg(cap_field)
            .invoke_async(&mut conn)
            .await?;
        Ok(Self::outcome(reply))
    }

    async fn hset_bounded(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        field: &str,
        cap_field: &str,
    ) -> AppResult<BoundedWrite> {
        let mut conn = self.conn.clone();
        let mut invocation = self.set_bounded.key(key);
        invocation.arg(field).arg(cap_field);
        for (name, value) in &fields {
            invocation.arg(name).arg(value);
        }
        let reply: i64 = invocation.invoke_async(&mut conn).await?;
        Ok(match reply {
            -1 => BoundedWrite::Missing,
            0 => BoundedWrite::Rejected,
            _ => BoundedWrite::Written,
        })
    }
}
