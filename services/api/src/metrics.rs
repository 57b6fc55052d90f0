//! Diet-adherence metrics
//!
//! Everything here is a pure function of a meal history: no I/O, no clock,
//! no shared state. The route layer fetches the snapshot and hands it over.

use serde::Serialize;

use crate::models::Meal;

/// Summary of how well a user kept to their diet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMetrics {
    pub registered_meals: u64,
    pub meals_on_diet: u64,
    pub meals_not_on_diet: u64,
    pub best_sequence_on_diet: u64,
}

impl MealMetrics {
    /// Computes the summary over meals in the order given.
    pub fn from_ordered(meals: &[Meal]) -> Self {
        let registered_meals = meals.len() as u64;
        let meals_on_diet = meals.iter().filter(|meal| meal.permitted).count() as u64;

        Self {
            registered_meals,
            meals_on_diet,
            meals_not_on_diet: registered_meals - meals_on_diet,
            best_sequence_on_diet: best_sequence_on_diet(meals.iter().map(|meal| meal.permitted)),
        }
    }

    /// Computes the summary in chronological order.
    ///
    /// Meals are stably sorted by `occurred_at`, so meals sharing a timestamp
    /// keep the order the repository returned them in (creation order).
    pub fn from_history(mut meals: Vec<Meal>) -> Self {
        meals.sort_by_key(|meal| meal.occurred_at);
        Self::from_ordered(&meals)
    }
}

/// Length of the longest contiguous run of `true` flags.
pub fn best_sequence_on_diet<I>(flags: I) -> u64
where
    I: IntoIterator<Item = bool>,
{
    let mut streak = 0u64;
    let mut best = 0u64;

    for permitted in flags {
        if permitted {
            streak += 1;
        } else {
            streak = 0;
        }

        if streak > best {
            best = streak;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 30, 8, 0, 0).unwrap()
    }

    /// Builds meals one hour apart, in the order of `flags`.
    fn history(flags: &[bool]) -> Vec<Meal> {
        let user_id = Uuid::new_v4();
        flags
            .iter()
            .enumerate()
            .map(|(i, &permitted)| {
                let at = base_time() + Duration::hours(i as i64);
                Meal {
                    id: Uuid::new_v4(),
                    user_id,
                    name: format!("meal {i}"),
                    description: "test".to_string(),
                    permitted,
                    occurred_at: at,
                    created_at: at,
                }
            })
            .collect()
    }

    #[test]
    fn empty_history_is_all_zero() {
        assert_eq!(MealMetrics::from_ordered(&[]), MealMetrics::default());
        assert_eq!(MealMetrics::from_history(Vec::new()), MealMetrics::default());
    }

    #[test]
    fn single_meal() {
        let on = MealMetrics::from_ordered(&history(&[true]));
        assert_eq!(on.registered_meals, 1);
        assert_eq!(on.best_sequence_on_diet, 1);

        let off = MealMetrics::from_ordered(&history(&[false]));
        assert_eq!(off.registered_meals, 1);
        assert_eq!(off.meals_not_on_diet, 1);
        assert_eq!(off.best_sequence_on_diet, 0);
    }

    #[test]
    fn interrupted_run_counts_the_longest_segment() {
        let metrics = MealMetrics::from_ordered(&history(&[true, false, true, true]));
        assert_eq!(
            metrics,
            MealMetrics {
                registered_meals: 4,
                meals_on_diet: 3,
                meals_not_on_diet: 1,
                best_sequence_on_diet: 2,
            }
        );
    }

    #[test]
    fn all_permitted_run_spans_the_history() {
        let metrics = MealMetrics::from_ordered(&history(&[true; 5]));
        assert_eq!(metrics.best_sequence_on_diet, 5);
        assert_eq!(metrics.best_sequence_on_diet, metrics.registered_meals);
    }

    #[test]
    fn nothing_permitted_has_no_run() {
        let metrics = MealMetrics::from_ordered(&history(&[false; 4]));
        assert_eq!(metrics.meals_on_diet, 0);
        assert_eq!(metrics.meals_not_on_diet, 4);
        assert_eq!(metrics.best_sequence_on_diet, 0);
    }

    #[test]
    fn earlier_run_wins_over_later_shorter_run() {
        assert_eq!(
            best_sequence_on_diet([true, true, true, false, true, false, true, true]),
            3
        );
    }

    #[test]
    fn counts_and_best_run_hold_for_every_small_history() {
        // Exhaustive over all histories of up to 8 meals.
        for len in 0..=8u32 {
            for mask in 0..(1u32 << len) {
                let flags: Vec<bool> = (0..len).map(|bit| mask & (1 << bit) != 0).collect();
                let metrics = MealMetrics::from_ordered(&history(&flags));

                assert_eq!(
                    metrics.meals_on_diet + metrics.meals_not_on_diet,
                    metrics.registered_meals
                );
                assert!(metrics.best_sequence_on_diet <= metrics.registered_meals);
                assert_eq!(
                    metrics.best_sequence_on_diet == metrics.registered_meals,
                    flags.iter().all(|&permitted| permitted),
                    "flags = {flags:?}"
                );
            }
        }
    }

    #[test]
    fn recomputing_yields_the_same_summary() {
        let meals = history(&[true, true, false, true]);
        assert_eq!(
            MealMetrics::from_ordered(&meals),
            MealMetrics::from_ordered(&meals)
        );
        assert_eq!(
            MealMetrics::from_history(meals.clone()),
            MealMetrics::from_history(meals)
        );
    }

    #[test]
    fn history_is_scanned_chronologically() {
        // Recorded as [off, on, on, on] but eaten as [on, off, on, on].
        let mut meals = history(&[true, false, true, true]);
        meals.swap(0, 1);

        assert_eq!(MealMetrics::from_ordered(&meals).best_sequence_on_diet, 3);
        assert_eq!(MealMetrics::from_history(meals).best_sequence_on_diet, 2);
    }

    #[test]
    fn equal_timestamps_keep_creation_order() {
        let mut meals = history(&[true, false, true]);
        for meal in &mut meals {
            meal.occurred_at = base_time();
        }

        let metrics = MealMetrics::from_history(meals);
        assert_eq!(metrics.best_sequence_on_diet, 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let metrics = MealMetrics::from_ordered(&history(&[true, false, true, true]));
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "registeredMeals": 4,
                "mealsOnDiet": 3,
                "mealsNotOnDiet": 1,
                "bestSequenceOnDiet": 2,
            })
        );
    }
}
