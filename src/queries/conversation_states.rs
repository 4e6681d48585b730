use crate::error::Result;

use crate::DbConn;

/// Gets the persisted state name of a conversation. The conversation may not exist.
pub async fn get_state(conn: &mut DbConn, conversation_id: &str) -> Result<Option<String>> {
    let state = sqlx::query_scalar::<_, String>(
        r#"
        SELECT state
        FROM conversation_states
        WHERE conversation_id = $1
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(conn)
    .await?;

    Ok(state)
}

/// Inserts or replaces the state of a conversation.
pub async fn upsert_state(conn: &mut DbConn, conversation_id: &str, state: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO conversation_states (conversation_id, state, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (conversation_id)
        DO UPDATE SET state = EXCLUDED.state, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(conversation_id)
    .bind(state)
    .execute(conn)
    .await?;

    Ok(())
}
