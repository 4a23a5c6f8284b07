use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::review::Review;

/// Mean rating rounded to one decimal place, as stored on the turf row.
pub fn rounded_mean(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i32 = ratings.iter().sum();
    let mean = f64::from(sum) / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Upserts the user's review of a turf and recomputes the turf's aggregate
/// rating and review count, all inside one transaction so the aggregate can
/// never drift from the review set.
pub async fn submit_review(
    db: &sqlx::PgPool,
    user_id: Uuid,
    turf_id: Uuid,
    rating: i32,
    comment: Option<&str>,
) -> AppResult<Review> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5.".into()));
    }

    let has_booked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM bookings WHERE user_id = $1 AND turf_id = $2)",
    )
    .bind(user_id)
    .bind(turf_id)
    .fetch_one(db)
    .await?;

    if !has_booked {
        return Err(AppError::Forbidden(
            "You can only review turfs you have booked.".into(),
        ));
    }

    let mut tx = db.begin().await?;

    // A repeat review from the same user replaces the earlier one.
    let review: Review = sqlx::query_as(
        r#"INSERT INTO reviews (id, user_id, turf_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, turf_id)
        DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(turf_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(&mut *tx)
    .await?;

    let ratings: Vec<i32> =
        sqlx::query_scalar("SELECT rating FROM reviews WHERE turf_id = $1")
            .bind(turf_id)
            .fetch_all(&mut *tx)
            .await?;

    sqlx::query("UPDATE turfs SET rating = $1, review_count = $2 WHERE id = $3")
        .bind(rounded_mean(&ratings).unwrap_or(0.0))
        .bind(ratings.len() as i32)
        .bind(turf_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_five_and_three_is_four() {
        assert_eq!(rounded_mean(&[5, 3]), Some(4.0));
    }

    #[test]
    fn updated_review_replaces_rather_than_adds() {
        // First user re-rates 5 -> 1 alongside an existing 3: the set is
        // {1, 3}, not {5, 3, 1}.
        assert_eq!(rounded_mean(&[1, 3]), Some(2.0));
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        assert_eq!(rounded_mean(&[4, 4, 5]), Some(4.3));
        assert_eq!(rounded_mean(&[5, 4]), Some(4.5));
        assert_eq!(rounded_mean(&[2, 2, 3]), Some(2.3));
    }

    #[test]
    fn empty_review_set_has_no_mean() {
        assert_eq!(rounded_mean(&[]), None);
    }
}
