//! Reduction of per-face classifier output to a single result.

use vision_ai_common::EmotionResult;

use crate::classifier::{FaceEmotion, InferenceError};

/// Pick the first face in detection order and normalize its scores.
///
/// Multi-face frames are reduced to the first face on purpose. The dominant
/// label is always recomputed from the scores; the backend's own claim is
/// only compared for logging.
pub fn select_result(faces: Vec<FaceEmotion>) -> Result<EmotionResult, InferenceError> {
    let face_count = faces.len();
    let face = faces
        .into_iter()
        .next()
        .ok_or(InferenceError::EmptyResults)?;

    if face_count > 1 {
        tracing::debug!("Classifier found {} faces, using the first", face_count);
    }

    match face.region {
        Some(r) => tracing::debug!(
            "Selected face at ({}, {}) size {}x{}, detection confidence {:?}",
            r.x,
            r.y,
            r.w,
            r.h,
            face.face_confidence
        ),
        None => tracing::debug!("Selected face has no region"),
    }

    let reported = face.dominant;
    let result = EmotionResult::from_scores(face.scores).ok_or(InferenceError::InvalidScores)?;

    if let Some(reported) = reported {
        if reported != result.emotion() {
            tracing::debug!(
                "Classifier reported dominant emotion {:?}, recomputed {:?}",
                reported,
                result.emotion()
            );
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FaceRegion;
    use vision_ai_common::EmotionScores;

    fn face(pairs: &[(&str, f64)], dominant: Option<&str>) -> FaceEmotion {
        let scores: EmotionScores = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        FaceEmotion {
            dominant: dominant.map(String::from),
            ..FaceEmotion::new(scores)
        }
    }

    #[test]
    fn test_first_face_wins() {
        let faces = vec![
            face(&[("sad", 80.0), ("happy", 20.0)], Some("sad")),
            face(&[("sad", 1.0), ("happy", 99.0)], Some("happy")),
        ];
        let result = select_result(faces).unwrap();
        assert_eq!(result.emotion(), "sad");
        assert_eq!(result.confidence(), 80.0);
    }

    #[test]
    fn test_reported_dominant_is_not_trusted() {
        let faces = vec![face(&[("angry", 10.0), ("neutral", 60.0)], Some("angry"))];
        let result = select_result(faces).unwrap();
        assert_eq!(result.emotion(), "neutral");
        assert_eq!(result.confidence(), result.scores()["neutral"]);
    }

    #[test]
    fn test_face_metadata_does_not_affect_result() {
        let mut located = face(&[("fear", 40.0), ("surprise", 55.0)], Some("surprise"));
        located.region = Some(FaceRegion {
            x: 4,
            y: 6,
            w: 32,
            h: 32,
        });
        located.face_confidence = Some(0.91);

        let result = select_result(vec![located]).unwrap();
        assert_eq!(result.emotion(), "surprise");
        assert_eq!(result.confidence(), 55.0);
    }

    #[test]
    fn test_no_faces() {
        assert_eq!(select_result(vec![]), Err(InferenceError::EmptyResults));
    }

    #[test]
    fn test_empty_scores() {
        let faces = vec![face(&[], Some("happy"))];
        assert_eq!(select_result(faces), Err(InferenceError::InvalidScores));
    }
}
