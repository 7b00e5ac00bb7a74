use chrono::Utc;
use uuid::Uuid;

/// Builds a gateway order reference: `ORDER-{unix millis}-{user id}-{8 hex}`.
///
/// The database does not enforce uniqueness of this value, so the random
/// suffix keeps two attempts by the same user in the same millisecond apart.
/// The result stays within Midtrans' 50 character `order_id` limit.
pub fn generate_order_ref(user_id: i32) -> String {
    let entropy = (Uuid::new_v4().as_u128() >> 96) as u32;
    format!(
        "ORDER-{}-{}-{:08x}",
        Utc::now().timestamp_millis(),
        user_id,
        entropy
    )
}
