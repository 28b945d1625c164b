use std::collections::HashSet;

use thiserror::Error;

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::render::RenderCtx;
use crate::resources::Vertex;

use super::{BindingKind, BindingSlot};

/// Why a set of entries does not satisfy a binding layout.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum BindingMismatch {
    #[error("the pipeline declares no bindings")]
    NoLayout,

    #[error("the pipeline declares bindings but no binding set was supplied")]
    Unbound,

    #[error("the binding set was built against a different pipeline")]
    ForeignLayout,

    #[error("slot {0} is given more than once")]
    Duplicate(u32),

    #[error("slot {0} is not declared by the layout")]
    Undeclared(u32),

    #[error("slot {slot} expects a {expected}, got a {found}")]
    KindMismatch {
        slot: u32,
        expected: BindingKind,
        found: BindingKind,
    },

    #[error("slot {0} has no entry")]
    Missing(u32),
}

/// A borrowed resource to place in a slot.
#[derive(Debug, Copy, Clone)]
pub enum BindingResource<'a> {
    /// Whole-buffer binding.
    Buffer(&'a wgpu::Buffer),
    Sampler(&'a wgpu::Sampler),
    TextureView(&'a wgpu::TextureView),
}

impl<'a> BindingResource<'a> {
    pub fn kind(&self) -> BindingKind {
        match self {
            BindingResource::Buffer(_) => BindingKind::UniformBuffer,
            BindingResource::Sampler(_) => BindingKind::Sampler,
            BindingResource::TextureView(_) => BindingKind::Texture,
        }
    }

    fn to_wgpu(self) -> wgpu::BindingResource<'a> {
        match self {
            BindingResource::Buffer(b) => b.as_entire_binding(),
            BindingResource::Sampler(s) => wgpu::BindingResource::Sampler(s),
            BindingResource::TextureView(v) => wgpu::BindingResource::TextureView(v),
        }
    }
}

/// Slot index → resource.
#[derive(Debug, Copy, Clone)]
pub struct BindingEntry<'a> {
    pub binding: u32,
    pub resource: BindingResource<'a>,
}

impl<'a> BindingEntry<'a> {
    #[inline]
    pub fn new(binding: u32, resource: BindingResource<'a>) -> Self {
        Self { binding, resource }
    }
}

/// Checks that `provided` assigns exactly one resource of the right kind to
/// every slot in `slots`, and nothing else.
pub fn check_entries(
    slots: &[BindingSlot],
    provided: &[(u32, BindingKind)],
) -> std::result::Result<(), BindingMismatch> {
    let mut seen = HashSet::with_capacity(provided.len());

    for &(binding, found) in provided {
        if !seen.insert(binding) {
            return Err(BindingMismatch::Duplicate(binding));
        }
        let slot = slots
            .iter()
            .find(|s| s.binding == binding)
            .ok_or(BindingMismatch::Undeclared(binding))?;
        if slot.kind != found {
            return Err(BindingMismatch::KindMismatch {
                slot: binding,
                expected: slot.kind,
                found,
            });
        }
    }

    match slots.iter().find(|s| !seen.contains(&s.binding)) {
        Some(missing) => Err(BindingMismatch::Missing(missing.binding)),
        None => Ok(()),
    }
}

/// Immutable bind group validated against one pipeline's layout.
pub struct BindingSet {
    bind_group: wgpu::BindGroup,
    layout_id: u64,
}

impl BindingSet {
    /// Validates `entries` against `pipeline`'s binding layout and creates the
    /// bind group for `@group(0)`.
    pub fn bind<V: Vertex>(
        ctx: &RenderCtx<'_>,
        pipeline: &Pipeline<V>,
        entries: &[BindingEntry<'_>],
    ) -> Result<Self> {
        let layout = pipeline
            .bind_group_layout()
            .ok_or(BindingMismatch::NoLayout)?;

        let provided: Vec<(u32, BindingKind)> = entries
            .iter()
            .map(|e| (e.binding, e.resource.kind()))
            .collect();
        check_entries(pipeline.binding_layout(), &provided)?;

        let raw_entries: Vec<wgpu::BindGroupEntry<'_>> = entries
            .iter()
            .map(|e| wgpu::BindGroupEntry {
                binding: e.binding,
                resource: e.resource.to_wgpu(),
            })
            .collect();

        let label = format!("{} binding set", pipeline.label());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout,
            entries: &raw_entries,
        });

        Ok(Self {
            bind_group,
            layout_id: pipeline.layout_id(),
        })
    }

    pub fn raw(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Id of the pipeline layout this set was validated against.
    pub fn layout_id(&self) -> u64 {
        self.layout_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAG: wgpu::ShaderStages = wgpu::ShaderStages::FRAGMENT;

    fn voronoi_layout() -> [BindingSlot; 3] {
        [
            BindingSlot::uniform_buffer(0, FRAG),
            BindingSlot::sampler(1, FRAG),
            BindingSlot::texture(2, FRAG),
        ]
    }

    #[test]
    fn accepts_complete_mapping() {
        let provided = [
            (0, BindingKind::UniformBuffer),
            (1, BindingKind::Sampler),
            (2, BindingKind::Texture),
        ];
        assert_eq!(check_entries(&voronoi_layout(), &provided), Ok(()));
    }

    #[test]
    fn order_of_entries_does_not_matter() {
        let provided = [
            (2, BindingKind::Texture),
            (0, BindingKind::UniformBuffer),
            (1, BindingKind::Sampler),
        ];
        assert_eq!(check_entries(&voronoi_layout(), &provided), Ok(()));
    }

    #[test]
    fn rejects_missing_texture_slot() {
        let provided = [(0, BindingKind::UniformBuffer), (1, BindingKind::Sampler)];
        assert_eq!(
            check_entries(&voronoi_layout(), &provided),
            Err(BindingMismatch::Missing(2))
        );
    }

    #[test]
    fn rejects_buffer_in_sampler_slot() {
        let provided = [
            (0, BindingKind::UniformBuffer),
            (1, BindingKind::UniformBuffer),
            (2, BindingKind::Texture),
        ];
        assert_eq!(
            check_entries(&voronoi_layout(), &provided),
            Err(BindingMismatch::KindMismatch {
                slot: 1,
                expected: BindingKind::Sampler,
                found: BindingKind::UniformBuffer,
            })
        );
    }

    #[test]
    fn rejects_duplicate_slot() {
        let provided = [
            (0, BindingKind::UniformBuffer),
            (0, BindingKind::UniformBuffer),
            (1, BindingKind::Sampler),
            (2, BindingKind::Texture),
        ];
        assert_eq!(
            check_entries(&voronoi_layout(), &provided),
            Err(BindingMismatch::Duplicate(0))
        );
    }

    #[test]
    fn rejects_undeclared_slot() {
        let provided = [
            (0, BindingKind::UniformBuffer),
            (1, BindingKind::Sampler),
            (2, BindingKind::Texture),
            (3, BindingKind::Texture),
        ];
        assert_eq!(
            check_entries(&voronoi_layout(), &provided),
            Err(BindingMismatch::Undeclared(3))
        );
    }

    #[test]
    fn empty_layout_accepts_nothing() {
        assert_eq!(check_entries(&[], &[]), Ok(()));
        assert_eq!(
            check_entries(&[], &[(0, BindingKind::Sampler)]),
            Err(BindingMismatch::Undeclared(0))
        );
    }

    #[test]
    fn mismatch_message_names_kinds() {
        let err = BindingMismatch::KindMismatch {
            slot: 1,
            expected: BindingKind::Sampler,
            found: BindingKind::UniformBuffer,
        };
        assert_eq!(err.to_string(), "slot 1 expects a sampler, got a uniform buffer");
    }
}
