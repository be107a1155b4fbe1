// $1 status, $2 excluded status, $3 created since (inclusive), $4 created before (exclusive).
// NULL disables a predicate.

pub const INSERT_ALERT: &str = r#"
INSERT INTO alerts (id, user_id, lat, lon, location, distance, "timestamp", status, is_false_alert, response_time, resolved_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11);
"#;

pub const SELECT_ALERTS_NEWEST_FIRST: &str = r#"
SELECT id, user_id, lat, lon, location, distance, "timestamp", status, is_false_alert, response_time, resolved_at
FROM alerts
WHERE ($1::text IS NULL OR status = $1)
  AND ($2::text IS NULL OR status <> $2)
  AND ($3::timestamptz IS NULL OR "timestamp" >= $3)
  AND ($4::timestamptz IS NULL OR "timestamp" < $4)
ORDER BY "timestamp" DESC, id;
"#;

pub const SELECT_ALERTS_OLDEST_FIRST: &str = r#"
SELECT id, user_id, lat, lon, location, distance, "timestamp", status, is_false_alert, response_time, resolved_at
FROM alerts
WHERE ($1::text IS NULL OR status = $1)
  AND ($2::text IS NULL OR status <> $2)
  AND ($3::timestamptz IS NULL OR "timestamp" >= $3)
  AND ($4::timestamptz IS NULL OR "timestamp" < $4)
ORDER BY "timestamp" ASC, id;
"#;

pub const DELETE_ALERTS: &str = r#"
DELETE FROM alerts
WHERE ($1::text IS NULL OR status = $1)
  AND ($2::text IS NULL OR status <> $2)
  AND ($3::timestamptz IS NULL OR "timestamp" >= $3)
  AND ($4::timestamptz IS NULL OR "timestamp" < $4);
"#;

// Single statement so the "set once" columns are decided against the row as
// it is at write time. $1 id, $2 status, $3 false-alert flag (NULL keeps), $4 now.
pub const UPDATE_ALERT_STATUS: &str = r#"
UPDATE alerts
SET status = $2::text,
    is_false_alert = COALESCE($3::boolean, is_false_alert),
    response_time = CASE
        WHEN $2 <> 'pending' AND response_time IS NULL
            THEN GREATEST(EXTRACT(EPOCH FROM ($4::timestamptz - "timestamp"))::float8, 0)
        ELSE response_time
    END,
    resolved_at = CASE
        WHEN $2 = 'resolved' THEN COALESCE(resolved_at, $4::timestamptz)
        ELSE NULL
    END
WHERE id = $1
RETURNING id, user_id, lat, lon, location, distance, "timestamp", status, is_false_alert, response_time, resolved_at;
"#;
