//! Skeletal animation resources and pose evaluation
//!
//! A clip stores a bone hierarchy plus keyframe channels; evaluation samples
//! every channel at a point in time and composes the results into
//! model-space matrices. Clips are plain data and validate themselves once,
//! when a component binds them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::{Mat4, Quat, Transform, Vec3};

/// One sampled value on a channel's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    /// Sample time in seconds from clip start
    pub time: f32,
    /// Value at that time
    pub value: T,
}

impl<T> Keyframe<T> {
    /// Create a keyframe
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// One bone in a clip's hierarchy
///
/// Parents must precede their children, so a bone's parent index is always
/// smaller than its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Bone name, unique within the clip
    pub name: String,
    /// Index of the parent bone, or `None` for a root
    pub parent: Option<usize>,
}

/// Keyframe channels for one bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneChannel {
    /// Translation keys, sorted by time
    pub translations: Vec<Keyframe<Vec3>>,
    /// Rotation keys, sorted by time
    pub rotations: Vec<Keyframe<Quat>>,
}

/// A skeletal animation clip
///
/// `channels` is index-aligned with `bones`. All keyframe times live inside
/// `[0, duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name for diagnostics
    pub name: String,
    /// Length of the clip in seconds
    pub duration: f32,
    /// Bone hierarchy, parents first
    pub bones: Vec<Bone>,
    /// Per-bone keyframe channels
    pub channels: Vec<BoneChannel>,
}

/// Validation failures for clip data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipError {
    /// Duration was zero, negative, or not finite
    #[error("clip '{name}' has an invalid duration")]
    BadDuration {
        /// Offending clip
        name: String,
    },

    /// The clip declared no bones
    #[error("clip '{name}' has no bones")]
    NoBones {
        /// Offending clip
        name: String,
    },

    /// Channel list length differs from bone list length
    #[error("clip '{name}': {channels} channels for {bones} bones")]
    ChannelMismatch {
        /// Offending clip
        name: String,
        /// Number of channels found
        channels: usize,
        /// Number of bones found
        bones: usize,
    },

    /// A bone's parent does not precede it in the hierarchy
    #[error("clip '{name}': bone {bone} references parent {parent} which does not precede it")]
    ParentOrder {
        /// Offending clip
        name: String,
        /// Index of the misparented bone
        bone: usize,
        /// Parent index it referenced
        parent: usize,
    },

    /// A channel has no keyframes at all
    #[error("clip '{name}': bone {bone} has an empty channel")]
    EmptyChannel {
        /// Offending clip
        name: String,
        /// Bone whose channel is empty
        bone: usize,
    },

    /// Keyframes on a channel are not sorted by time
    #[error("clip '{name}': bone {bone} keyframes are out of order")]
    UnsortedKeys {
        /// Offending clip
        name: String,
        /// Bone whose channel is unsorted
        bone: usize,
    },

    /// A keyframe lies outside the clip's duration
    #[error("clip '{name}': bone {bone} keyframe at {time}s is outside the clip")]
    KeyOutOfRange {
        /// Offending clip
        name: String,
        /// Bone whose channel has the stray key
        bone: usize,
        /// Time of the stray key
        time: f32,
    },
}

impl AnimationClip {
    /// Check the structural assumptions evaluation relies on
    pub fn validate(&self) -> Result<(), ClipError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ClipError::BadDuration {
                name: self.name.clone(),
            });
        }
        if self.bones.is_empty() {
            return Err(ClipError::NoBones {
                name: self.name.clone(),
            });
        }
        if self.channels.len() != self.bones.len() {
            return Err(ClipError::ChannelMismatch {
                name: self.name.clone(),
                channels: self.channels.len(),
                bones: self.bones.len(),
            });
        }
        for (index, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= index {
                    return Err(ClipError::ParentOrder {
                        name: self.name.clone(),
                        bone: index,
                        parent,
                    });
                }
            }
        }
        for (index, channel) in self.channels.iter().enumerate() {
            self.validate_keys(index, &channel.translations)?;
            self.validate_keys(index, &channel.rotations)?;
        }
        Ok(())
    }

    fn validate_keys<T>(&self, bone: usize, keys: &[Keyframe<T>]) -> Result<(), ClipError> {
        if keys.is_empty() {
            return Err(ClipError::EmptyChannel {
                name: self.name.clone(),
                bone,
            });
        }
        for pair in keys.windows(2) {
            if pair[1].time < pair[0].time {
                return Err(ClipError::UnsortedKeys {
                    name: self.name.clone(),
                    bone,
                });
            }
        }
        for key in keys {
            if key.time < 0.0 || key.time > self.duration {
                return Err(ClipError::KeyOutOfRange {
                    name: self.name.clone(),
                    bone,
                    time: key.time,
                });
            }
        }
        Ok(())
    }

    /// Evaluate the clip at `time` seconds into model-space bone matrices
    ///
    /// Times outside the keyed range clamp to the nearest key. The clip is
    /// expected to be validated; an unvalidated clip still evaluates without
    /// panicking, treating unresolvable parents as roots.
    pub fn evaluate(&self, time: f32) -> AnimationResult {
        let mut bone_matrices: Vec<Mat4> = Vec::with_capacity(self.bones.len());
        for (bone, channel) in self.bones.iter().zip(&self.channels) {
            let local = Transform {
                position: sample_vec3(&channel.translations, time),
                rotation: sample_quat(&channel.rotations, time),
                scale: Vec3::new(1.0, 1.0, 1.0),
            }
            .to_matrix();
            let global = bone
                .parent
                .and_then(|parent| bone_matrices.get(parent))
                .map_or(local, |parent_matrix| parent_matrix * local);
            bone_matrices.push(global);
        }
        AnimationResult { bone_matrices }
    }
}

/// Bone hierarchy extracted from a validated clip
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    /// Build the skeleton view of a clip's hierarchy
    pub fn from_clip(clip: &AnimationClip) -> Self {
        Self {
            bones: clip.bones.clone(),
        }
    }

    /// Number of bones
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Bones in hierarchy order, parents first
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }
}

/// Evaluated pose: one model-space matrix per bone
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationResult {
    /// Matrices in the same order as the clip's bones
    pub bone_matrices: Vec<Mat4>,
}

fn sample_vec3(keys: &[Keyframe<Vec3>], time: f32) -> Vec3 {
    sample(keys, time, Vec3::zeros, |a, b, t| a.lerp(&b, t))
}

fn sample_quat(keys: &[Keyframe<Quat>], time: f32) -> Quat {
    // Opposed keys have no unique path; fall to the later key instead of
    // panicking inside the slerp.
    sample(keys, time, Quat::identity, |a, b, t| {
        a.try_slerp(&b, t, 1.0e-6).unwrap_or(b)
    })
}

fn sample<T: Copy>(
    keys: &[Keyframe<T>],
    time: f32,
    fallback: impl Fn() -> T,
    blend: impl Fn(T, T, f32) -> T,
) -> T {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return fallback();
    };
    if time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }
    for pair in keys.windows(2) {
        if time <= pair[1].time {
            let span = pair[1].time - pair[0].time;
            if span <= f32::EPSILON {
                return pair[1].value;
            }
            let t = (time - pair[0].time) / span;
            return blend(pair[0].value, pair[1].value, t);
        }
    }
    last.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bob_clip() -> AnimationClip {
        AnimationClip {
            name: "bob".to_string(),
            duration: 1.0,
            bones: vec![Bone {
                name: "root".to_string(),
                parent: None,
            }],
            channels: vec![BoneChannel {
                translations: vec![
                    Keyframe::new(0.0, Vec3::zeros()),
                    Keyframe::new(1.0, Vec3::new(0.0, 2.0, 0.0)),
                ],
                rotations: vec![Keyframe::new(0.0, Quat::identity())],
            }],
        }
    }

    #[test]
    fn well_formed_clip_validates() {
        assert_eq!(bob_clip().validate(), Ok(()));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut clip = bob_clip();
        clip.duration = 0.0;
        assert!(matches!(clip.validate(), Err(ClipError::BadDuration { .. })));
    }

    #[test]
    fn channel_count_must_match_bone_count() {
        let mut clip = bob_clip();
        clip.channels.clear();
        assert!(matches!(
            clip.validate(),
            Err(ClipError::ChannelMismatch { .. })
        ));
    }

    #[test]
    fn parents_must_precede_children() {
        let mut clip = bob_clip();
        clip.bones[0].parent = Some(0);
        assert!(matches!(
            clip.validate(),
            Err(ClipError::ParentOrder { bone: 0, parent: 0, .. })
        ));
    }

    #[test]
    fn unsorted_keys_are_rejected() {
        let mut clip = bob_clip();
        clip.channels[0].translations = vec![
            Keyframe::new(0.8, Vec3::zeros()),
            Keyframe::new(0.2, Vec3::zeros()),
        ];
        assert!(matches!(
            clip.validate(),
            Err(ClipError::UnsortedKeys { bone: 0, .. })
        ));
    }

    #[test]
    fn keys_outside_the_duration_are_rejected() {
        let mut clip = bob_clip();
        clip.channels[0].rotations = vec![Keyframe::new(2.0, Quat::identity())];
        assert!(matches!(
            clip.validate(),
            Err(ClipError::KeyOutOfRange { bone: 0, .. })
        ));
    }

    #[test]
    fn sampling_interpolates_between_keys() {
        let clip = bob_clip();
        let pose = clip.evaluate(0.5);
        let origin = nalgebra::Point3::origin();
        let moved = pose.bone_matrices[0].transform_point(&origin);
        assert_relative_eq!(moved.coords, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn sampling_clamps_outside_the_keyed_range() {
        let clip = bob_clip();
        let origin = nalgebra::Point3::origin();

        let before = clip.evaluate(-1.0);
        assert_relative_eq!(
            before.bone_matrices[0].transform_point(&origin).coords,
            Vec3::zeros()
        );

        let after = clip.evaluate(5.0);
        assert_relative_eq!(
            after.bone_matrices[0].transform_point(&origin).coords,
            Vec3::new(0.0, 2.0, 0.0)
        );
    }

    #[test]
    fn rotation_keys_blend_by_slerp() {
        let quarter = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let keys = vec![Keyframe::new(0.0, Quat::identity()), Keyframe::new(1.0, quarter)];
        let halfway = sample_quat(&keys, 0.5);
        let expected = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_4);
        assert_relative_eq!(halfway.angle(), expected.angle(), epsilon = 1.0e-5);
    }

    #[test]
    fn child_bones_inherit_parent_motion() {
        let clip = AnimationClip {
            name: "arm".to_string(),
            duration: 1.0,
            bones: vec![
                Bone {
                    name: "shoulder".to_string(),
                    parent: None,
                },
                Bone {
                    name: "elbow".to_string(),
                    parent: Some(0),
                },
            ],
            channels: vec![
                BoneChannel {
                    translations: vec![Keyframe::new(0.0, Vec3::new(1.0, 0.0, 0.0))],
                    rotations: vec![Keyframe::new(0.0, Quat::identity())],
                },
                BoneChannel {
                    translations: vec![Keyframe::new(0.0, Vec3::new(0.0, 1.0, 0.0))],
                    rotations: vec![Keyframe::new(0.0, Quat::identity())],
                },
            ],
        };
        assert_eq!(clip.validate(), Ok(()));

        let pose = clip.evaluate(0.0);
        let origin = nalgebra::Point3::origin();
        let elbow = pose.bone_matrices[1].transform_point(&origin);
        assert_relative_eq!(elbow.coords, Vec3::new(1.0, 1.0, 0.0), epsilon = 1.0e-6);
    }
}
