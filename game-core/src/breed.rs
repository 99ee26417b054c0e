use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreedNameError {
    #[error("No breed segment in image URL: {url}")]
    MissingBreedSegment { url: String },
}

/// Derive the breed label encoded in an image URL.
///
/// The breed lives in the path segment just before the filename, e.g.
/// `https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg`.
/// Compound segments are written `category-subbreed` and come back as
/// `"subbreed category"`. Only the first hyphen splits, so `a-b-c` becomes
/// `"b-c a"`.
pub fn derive_breed_name(url: &str) -> Result<String, BreedNameError> {
    let segment = breed_segment(url).ok_or_else(|| BreedNameError::MissingBreedSegment {
        url: url.to_string(),
    })?;

    let breed = match segment.split_once('-') {
        Some((category, sub_breed)) => format!("{} {}", sub_breed, category),
        None => segment.to_string(),
    };

    Ok(breed)
}

/// Upper-cased form shown when the answer is revealed.
pub fn reveal_answer(breed: &str) -> String {
    breed.to_uppercase()
}

/// Case-insensitive comparison of a guess against the derived breed.
pub fn is_correct_guess(guess: &str, breed: &str) -> bool {
    guess.to_lowercase() == breed.to_lowercase()
}

fn breed_segment(url: &str) -> Option<&str> {
    // Drop fragment and query before looking at the path
    let url = url.split('#').next().unwrap_or(url);
    let url = url.split('?').next().unwrap_or(url);
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path)?,
        None => url,
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }

    let segment = segments[segments.len() - 2];
    if segment.trim_matches('-').is_empty() {
        return None;
    }

    Some(segment)
}
