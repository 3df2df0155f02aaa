//! Photo ranking: pure selection of the most-liked photos.

use crate::error::{CoreError, Result};
use crate::profile::Photo;

/// Select the `limit` most popular photos, most-liked first.
///
/// The sort is stable, so photos with equal like counts keep their source
/// order. `limit` must be at least 1; an empty input yields an empty output.
pub fn rank(photos: &[Photo], limit: usize) -> Result<Vec<Photo>> {
    if limit == 0 {
        return Err(CoreError::InvalidPhotoLimit { limit });
    }

    let mut ranked = photos.to_vec();
    ranked.sort_by(|a, b| b.likes.cmp(&a.likes));
    ranked.truncate(limit);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::id::PhotoId;

    fn photo(id: &str, likes: u32) -> Photo {
        Photo {
            id: PhotoId::new(id),
            likes,
            url: format!("https://photos.example/{id}"),
        }
    }

    fn likes(ranked: &[Photo]) -> Vec<u32> {
        ranked.iter().map(|p| p.likes).collect()
    }

    #[test]
    fn orders_descending_and_truncates() {
        let photos = vec![
            photo("a", 1),
            photo("b", 9),
            photo("c", 3),
            photo("d", 7),
            photo("e", 2),
        ];
        let ranked = rank(&photos, 3).unwrap();
        assert_eq!(likes(&ranked), vec![9, 7, 3]);
    }

    #[test]
    fn ties_keep_source_order() {
        let photos = vec![photo("first", 5), photo("second", 5), photo("third", 5)];
        let ranked = rank(&photos, 3).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn shorter_input_than_limit_returns_everything() {
        let photos = vec![photo("a", 2), photo("b", 4)];
        let ranked = rank(&photos, 10).unwrap();
        assert_eq!(likes(&ranked), vec![4, 2]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rank(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = rank(&[photo("a", 1)], 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPhotoLimit { limit: 0 }));
    }
}
