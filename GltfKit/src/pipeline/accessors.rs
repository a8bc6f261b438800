//! Joint and weight accessor normalization.
//!
//! Skinning attributes must use unsigned integer components downstream.
//! Accessors with other encodings are decoded, re-encoded into the required
//! component type and moved to a freshly appended buffer; the source bytes
//! stay where they were so other accessors sharing them are unaffected.

use std::fmt;

use indexmap::IndexMap;

use crate::error::Result;
use crate::formats::gltf::component::{GL_BYTE, GL_SHORT, GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT};
use crate::formats::gltf::{ComponentType, GltfAsset};

/// A vertex-attribute role whose component encoding is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeRole {
    /// `JOINTS_0`
    Joints,
    /// `WEIGHTS_0`
    Weights,
}

impl AttributeRole {
    /// Every role, in the order they are applied.
    pub const ALL: [Self; 2] = [Self::Joints, Self::Weights];

    #[must_use]
    pub fn semantic(self) -> &'static str {
        match self {
            Self::Joints => "JOINTS_0",
            Self::Weights => "WEIGHTS_0",
        }
    }

    /// Required encoding for an accessor currently using `component_type`
    /// (raw GL enum), or `None` when it is already acceptable.
    #[must_use]
    pub fn target_component_type(self, component_type: u32) -> Option<ComponentType> {
        match (self, component_type) {
            (Self::Joints | Self::Weights, GL_BYTE) => Some(ComponentType::UnsignedByte),
            (Self::Joints, GL_UNSIGNED_BYTE | GL_UNSIGNED_SHORT) => None,
            (Self::Joints, _) => Some(ComponentType::UnsignedShort),
            (Self::Weights, GL_SHORT) => Some(ComponentType::UnsignedShort),
            (Self::Weights, _) => None,
        }
    }
}

impl fmt::Display for AttributeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.semantic())
    }
}

/// One rewritten accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentConversion {
    pub accessor: usize,
    pub role: AttributeRole,
    pub from: ComponentType,
    pub to: ComponentType,
    /// The new buffer view holding the re-encoded data.
    pub buffer_view: usize,
}

/// What a normalization pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub conversions: Vec<ComponentConversion>,
}

impl NormalizeReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

/// Normalize `JOINTS_0` and `WEIGHTS_0` accessors.
///
/// | Role    | Source                  | Target |
/// |---------|-------------------------|--------|
/// | joints  | `BYTE`                  | `UNSIGNED_BYTE` |
/// | joints  | not `UNSIGNED_BYTE`/`UNSIGNED_SHORT` | `UNSIGNED_SHORT` |
/// | weights | `BYTE`                  | `UNSIGNED_BYTE` |
/// | weights | `SHORT`                 | `UNSIGNED_SHORT` |
///
/// # Errors
/// Returns an error if a referenced accessor, buffer view or buffer is
/// missing, or an accessor that needs converting cannot be decoded. The asset
/// is left unchanged on error.
pub fn update_accessor_component_types(asset: &mut GltfAsset) -> Result<NormalizeReport> {
    update_accessor_component_types_for(asset, &AttributeRole::ALL)
}

/// Like [`update_accessor_component_types`], limited to `roles`.
///
/// Joints are always handled before weights, whatever the order of `roles`.
/// An accessor bound to both is checked against the encoding the joints rule
/// already chose for it.
///
/// # Errors
/// See [`update_accessor_component_types`].
pub fn update_accessor_component_types_for(
    asset: &mut GltfAsset,
    roles: &[AttributeRole],
) -> Result<NormalizeReport> {
    let mut planned: IndexMap<usize, PlannedConversion> = IndexMap::new();

    for role in AttributeRole::ALL.into_iter().filter(|role| roles.contains(role)) {
        for found in asset.accessors_with_semantic(role.semantic()) {
            let accessor = asset.accessor(found.accessor, &found)?;

            if let Some(plan) = planned.get_mut(&found.accessor) {
                if let Some(target) = role.target_component_type(plan.to.to_gl()) {
                    tracing::debug!(
                        "{}: accessor {} {} -> {}",
                        found,
                        found.accessor,
                        plan.to,
                        target
                    );
                    plan.role = role;
                    plan.to = target;
                }
                continue;
            }

            let Some(target) = role.target_component_type(accessor.component_type) else {
                continue;
            };

            let (source, _) = asset.accessor_layout(found.accessor)?;
            let values = asset.read_accessor_packed(found.accessor)?;
            tracing::debug!(
                "{}: accessor {} {} -> {} ({} components)",
                found,
                found.accessor,
                source,
                target,
                values.len()
            );
            planned.insert(
                found.accessor,
                PlannedConversion {
                    role,
                    from: source,
                    to: target,
                    values,
                },
            );
        }
    }

    // Everything decoded; only now touch the asset
    let mut report = NormalizeReport::default();
    for (accessor, plan) in planned {
        let buffer_view = asset.add_buffer(plan.to.encode(&plan.values));
        let acc = &mut asset.accessors[accessor];
        acc.component_type = plan.to.to_gl();
        acc.buffer_view = Some(buffer_view);
        acc.byte_offset = 0;

        report.conversions.push(ComponentConversion {
            accessor,
            role: plan.role,
            from: plan.from,
            to: plan.to,
            buffer_view,
        });
    }

    if !report.is_empty() {
        tracing::info!(
            "Normalized component types of {} skinning accessors",
            report.conversions.len()
        );
    }
    Ok(report)
}

/// A decoded accessor waiting to be written back.
struct PlannedConversion {
    role: AttributeRole,
    from: ComponentType,
    to: ComponentType,
    values: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::gltf::component::{GL_FLOAT, GL_UNSIGNED_INT};
    use crate::formats::gltf::{
        AccessorType, GltfAccessor, GltfBuffer, GltfBufferView, GltfMesh, GltfPrimitive,
    };
    use pretty_assertions::assert_eq;
    use serde_json::Map;

    /// Builds an asset whose single buffer holds every accessor back to back.
    #[derive(Default)]
    struct Fixture {
        asset: GltfAsset,
        data: Vec<u8>,
    }

    impl Fixture {
        fn accessor(&mut self, component_type: u32, accessor_type: &str, values: &[f64]) -> usize {
            let ty = ComponentType::from_gl(component_type).unwrap();
            let arity = AccessorType::from_name(accessor_type).unwrap().component_count();
            let count = values.len() / arity;
            let bytes = ty.encode(values);
            let buffer_view = self.asset.buffer_views.len();
            self.asset.buffer_views.push(GltfBufferView {
                buffer: 0,
                byte_offset: self.data.len(),
                byte_length: bytes.len(),
                byte_stride: None,
                target: Some(34962),
                other: Map::new(),
            });
            self.data.extend_from_slice(&bytes);
            // Keep views 4-byte aligned like a real exporter would
            while self.data.len() % 4 != 0 {
                self.data.push(0);
            }
            self.asset.accessors.push(GltfAccessor {
                buffer_view: Some(buffer_view),
                byte_offset: 0,
                component_type,
                count,
                accessor_type: accessor_type.to_string(),
                normalized: false,
                other: Map::new(),
            });
            self.asset.accessors.len() - 1
        }

        fn primitive(&mut self, attributes: &[(&str, usize)]) {
            let attributes: IndexMap<String, usize> =
                attributes.iter().map(|(k, v)| ((*k).to_string(), *v)).collect();
            self.asset.meshes.push(GltfMesh {
                name: None,
                primitives: vec![GltfPrimitive {
                    attributes,
                    targets: Vec::new(),
                    other: Map::new(),
                }],
                other: Map::new(),
            });
        }

        fn build(mut self) -> GltfAsset {
            self.asset.buffers.push(GltfBuffer::from_bytes(self.data));
            self.asset
        }
    }

    const JOINTS: [f64; 8] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

    fn single_joints(component_type: u32) -> GltfAsset {
        let mut fx = Fixture::default();
        let joints = fx.accessor(component_type, "VEC4", &JOINTS);
        fx.primitive(&[("JOINTS_0", joints)]);
        fx.build()
    }

    #[test]
    fn test_signed_byte_joints_become_unsigned_byte() {
        let mut asset = single_joints(GL_BYTE);
        let original_buffer = asset.buffers[0].data.clone();

        let report = update_accessor_component_types(&mut asset).unwrap();

        assert_eq!(report.conversions.len(), 1);
        assert_eq!(report.conversions[0].from, ComponentType::Byte);
        assert_eq!(report.conversions[0].to, ComponentType::UnsignedByte);
        let acc = &asset.accessors[0];
        assert_eq!(acc.component_type, GL_UNSIGNED_BYTE);
        assert_eq!(acc.byte_offset, 0);
        assert_eq!(acc.buffer_view, Some(1));
        assert_eq!(asset.read_accessor_packed(0).unwrap(), JOINTS.to_vec());

        // Source buffer untouched, new one appended
        assert_eq!(asset.buffers.len(), 2);
        assert_eq!(asset.buffers[0].data, original_buffer);
        assert_eq!(asset.buffers[1].data, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(asset.buffer_views[1].byte_length, 8);
        assert_eq!(asset.buffer_views[1].byte_stride, None);
    }

    #[test]
    fn test_wide_joints_become_unsigned_short() {
        for source in [GL_SHORT, GL_UNSIGNED_INT, GL_FLOAT] {
            let mut asset = single_joints(source);
            update_accessor_component_types(&mut asset).unwrap();

            let acc = &asset.accessors[0];
            assert_eq!(acc.component_type, GL_UNSIGNED_SHORT, "source {source}");
            assert_eq!(acc.byte_offset, 0);
            assert_eq!(asset.read_accessor_packed(0).unwrap(), JOINTS.to_vec());
            assert_eq!(asset.buffers[1].data.len(), JOINTS.len() * 2);
        }
    }

    #[test]
    fn test_compliant_joints_untouched() {
        for source in [GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT] {
            let mut asset = single_joints(source);
            let before = asset.clone();
            let report = update_accessor_component_types(&mut asset).unwrap();
            assert!(report.is_empty());
            assert_eq!(asset, before);
        }
    }

    #[test]
    fn test_weights_policy() {
        let weights = [0.0, 10.0, 20.0, 30.0];
        let expectations = [
            (GL_BYTE, GL_UNSIGNED_BYTE),
            (GL_SHORT, GL_UNSIGNED_SHORT),
            (GL_UNSIGNED_BYTE, GL_UNSIGNED_BYTE),
            (GL_UNSIGNED_SHORT, GL_UNSIGNED_SHORT),
            (GL_FLOAT, GL_FLOAT),
        ];
        for (source, expected) in expectations {
            let mut fx = Fixture::default();
            let acc = fx.accessor(source, "VEC4", &weights);
            fx.primitive(&[("WEIGHTS_0", acc)]);
            let mut asset = fx.build();
            let before = asset.read_accessor_packed(acc).unwrap();

            update_accessor_component_types(&mut asset).unwrap();

            assert_eq!(asset.accessors[acc].component_type, expected, "source {source}");
            assert_eq!(asset.read_accessor_packed(acc).unwrap(), before);
        }
    }

    #[test]
    fn test_normalized_flag_kept_and_values_not_rescaled() {
        let mut fx = Fixture::default();
        let acc = fx.accessor(GL_SHORT, "VEC4", &[32767.0, 0.0, 0.0, 0.0]);
        fx.primitive(&[("WEIGHTS_0", acc)]);
        let mut asset = fx.build();
        asset.accessors[acc].normalized = true;

        update_accessor_component_types(&mut asset).unwrap();

        assert!(asset.accessors[acc].normalized);
        assert_eq!(asset.read_accessor_packed(acc).unwrap(), vec![32767.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_idempotent() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_FLOAT, "VEC4", &JOINTS);
        let weights = fx.accessor(GL_BYTE, "VEC4", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        fx.primitive(&[("JOINTS_0", joints), ("WEIGHTS_0", weights)]);
        let mut asset = fx.build();

        let first = update_accessor_component_types(&mut asset).unwrap();
        assert_eq!(first.conversions.len(), 2);
        let once = asset.clone();

        let second = update_accessor_component_types(&mut asset).unwrap();
        assert!(second.is_empty());
        assert_eq!(asset, once);
    }

    #[test]
    fn test_accessor_offset_and_stride_are_resolved() {
        let mut asset = GltfAsset::default();
        // i16 VEC4 elements at a 12 byte stride, starting 4 bytes in
        let mut data = vec![0u8; 4];
        for element in [[1i16, 2, 3, 4], [5, 6, 7, 8]] {
            for v in element {
                data.extend_from_slice(&v.to_le_bytes());
            }
            data.extend_from_slice(&[0xEE; 4]);
        }
        asset.buffers.push(GltfBuffer::from_bytes(data));
        asset.buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset: 0,
            byte_length: 28,
            byte_stride: Some(12),
            target: None,
            other: Map::new(),
        });
        asset.accessors.push(GltfAccessor {
            buffer_view: Some(0),
            byte_offset: 4,
            component_type: GL_SHORT,
            count: 2,
            accessor_type: "VEC4".to_string(),
            normalized: false,
            other: Map::new(),
        });
        asset.meshes.push(GltfMesh {
            name: None,
            primitives: vec![GltfPrimitive {
                attributes: IndexMap::from([("JOINTS_0".to_string(), 0)]),
                targets: Vec::new(),
                other: Map::new(),
            }],
            other: Map::new(),
        });

        update_accessor_component_types(&mut asset).unwrap();

        assert_eq!(asset.accessors[0].byte_offset, 0);
        assert_eq!(
            asset.buffers[1].data,
            vec![1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8, 0]
        );
    }

    #[test]
    fn test_zero_count_accessor_gets_empty_buffer() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_BYTE, "VEC4", &[]);
        fx.primitive(&[("JOINTS_0", joints)]);
        let mut asset = fx.build();

        update_accessor_component_types(&mut asset).unwrap();

        assert_eq!(asset.accessors[joints].component_type, GL_UNSIGNED_BYTE);
        assert_eq!(asset.buffers[1].byte_length, 0);
        assert_eq!(asset.buffer_views[1].byte_length, 0);
    }

    #[test]
    fn test_shared_accessor_converted_once() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_SHORT, "VEC4", &JOINTS);
        fx.primitive(&[("JOINTS_0", joints)]);
        fx.primitive(&[("JOINTS_0", joints)]);
        let mut asset = fx.build();

        let report = update_accessor_component_types(&mut asset).unwrap();
        assert_eq!(report.conversions.len(), 1);
        assert_eq!(asset.buffers.len(), 2);
    }

    #[test]
    fn test_missing_accessor_is_fatal_and_leaves_asset_unchanged() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_FLOAT, "VEC4", &JOINTS);
        fx.primitive(&[("JOINTS_0", joints)]);
        fx.primitive(&[("WEIGHTS_0", 42)]);
        let mut asset = fx.build();
        let before = asset.clone();

        let err = update_accessor_component_types(&mut asset).unwrap_err();
        match err {
            Error::MissingAccessor { accessor, referenced_by } => {
                assert_eq!(accessor, 42);
                assert_eq!(referenced_by, "mesh 1 primitive 0 WEIGHTS_0");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(asset, before);
    }

    #[test]
    fn test_unsupported_component_type() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_FLOAT, "VEC4", &JOINTS);
        fx.primitive(&[("JOINTS_0", joints)]);
        let mut asset = fx.build();
        asset.accessors[joints].component_type = 5124;

        assert!(matches!(
            update_accessor_component_types(&mut asset),
            Err(Error::UnsupportedComponentType { accessor: 0, component_type: 5124 })
        ));

        // Weights with the same encoding are simply left alone
        let mut fx = Fixture::default();
        let weights = fx.accessor(GL_FLOAT, "VEC4", &[0.5, 0.5, 0.0, 0.0]);
        fx.primitive(&[("WEIGHTS_0", weights)]);
        let mut asset = fx.build();
        asset.accessors[weights].component_type = 5124;
        assert!(update_accessor_component_types(&mut asset).unwrap().is_empty());
    }

    #[test]
    fn test_roles_can_be_limited() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_BYTE, "VEC4", &JOINTS);
        let weights = fx.accessor(GL_BYTE, "VEC4", &JOINTS);
        fx.primitive(&[("JOINTS_0", joints), ("WEIGHTS_0", weights)]);
        let mut asset = fx.build();

        let report =
            update_accessor_component_types_for(&mut asset, &[AttributeRole::Weights]).unwrap();
        assert_eq!(report.conversions.len(), 1);
        assert_eq!(report.conversions[0].role, AttributeRole::Weights);
        assert_eq!(asset.accessors[joints].component_type, GL_BYTE);
        assert_eq!(asset.accessors[weights].component_type, GL_UNSIGNED_BYTE);
    }

    #[test]
    fn test_shared_accessor_gets_joints_rule_whatever_the_role_order() {
        for roles in [
            [AttributeRole::Joints, AttributeRole::Weights],
            [AttributeRole::Weights, AttributeRole::Joints],
        ] {
            let mut fx = Fixture::default();
            let shared = fx.accessor(GL_FLOAT, "VEC4", &JOINTS);
            fx.primitive(&[("JOINTS_0", shared), ("WEIGHTS_0", shared)]);
            let mut asset = fx.build();

            let report = update_accessor_component_types_for(&mut asset, &roles).unwrap();

            assert_eq!(report.conversions.len(), 1, "roles {roles:?}");
            assert_eq!(report.conversions[0].role, AttributeRole::Joints);
            assert_eq!(asset.accessors[shared].component_type, GL_UNSIGNED_SHORT);
            assert_eq!(asset.read_accessor_packed(shared).unwrap(), JOINTS.to_vec());
        }
    }

    #[test]
    fn test_weights_rule_sees_joints_encoding() {
        // SHORT joints become UNSIGNED_SHORT, which the weights rule accepts
        let mut fx = Fixture::default();
        let shared = fx.accessor(GL_SHORT, "VEC4", &JOINTS);
        fx.primitive(&[("WEIGHTS_0", shared)]);
        fx.primitive(&[("JOINTS_0", shared)]);
        let mut asset = fx.build();

        let report = update_accessor_component_types(&mut asset).unwrap();

        assert_eq!(report.conversions.len(), 1);
        assert_eq!(report.conversions[0].from, ComponentType::Short);
        assert_eq!(report.conversions[0].to, ComponentType::UnsignedShort);
        assert_eq!(asset.buffers.len(), 2);
    }

    #[test]
    fn test_overflowing_accessor_is_an_error() {
        let mut fx = Fixture::default();
        let joints = fx.accessor(GL_BYTE, "VEC4", &JOINTS);
        fx.primitive(&[("JOINTS_0", joints)]);
        let mut asset = fx.build();
        asset.accessors[joints].count = usize::MAX / 2;
        let before = asset.clone();

        assert!(matches!(
            update_accessor_component_types(&mut asset),
            Err(Error::AccessorOutOfBounds { accessor: 0, .. })
        ));
        assert_eq!(asset, before);

        asset.accessors[joints].count = 1;
        asset.accessors[joints].byte_offset = usize::MAX - 1;
        assert!(matches!(
            update_accessor_component_types(&mut asset),
            Err(Error::AccessorOutOfBounds { accessor: 0, .. })
        ));
    }
}
