use thiserror::Error;

use crate::context::{BufferTarget, GraphicsContext};
use crate::program::Program;

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

pub struct GeometryBuilder<'a> {
    attributes: Vec<(VertexAttribute, &'a str)>,
    data: &'a [f32],
    indices: &'a [u16],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: &[],
        }
    }

    /// Appends an interleaved attribute, bound later to the shader input
    /// called `name`.
    pub fn with_attribute(mut self, attr: VertexAttribute, name: &'a str) -> Self {
        self.attributes.push((attr, name));
        self
    }

    pub fn with_indices(mut self, indices: &'a [u16]) -> Self {
        self.indices = indices;
        self
    }

    /// Validates the mesh and uploads both buffers once, with static usage.
    pub fn build<C: GraphicsContext>(self, ctx: &mut C) -> Result<Geometry, GBError> {
        let total_len: usize = self.attributes.iter().map(|(a, _)| a.size()).sum();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / total_len;

        if self.indices.is_empty() {
            return Err(GBError::NoIndices);
        }

        if let Some(index) = self.indices.iter().find(|i| **i as usize >= vertices) {
            return Err(GBError::IndexOutOfRange {
                index: *index,
                vertices,
            });
        }

        let mut offset = 0;
        let layout = self
            .attributes
            .iter()
            .map(|(attr, name)| {
                let layout = AttributeLayout {
                    name: name.to_string(),
                    components: attr.size(),
                    offset: offset * FLOAT_SIZE,
                };
                offset += attr.size();
                layout
            })
            .collect();

        let vao = ctx.create_vertex_array();
        let vbo = ctx.create_buffer();
        let ebo = ctx.create_buffer();

        ctx.bind_vertex_array(vao);

        ctx.bind_buffer(BufferTarget::Vertex, vbo);
        ctx.buffer_data_static(BufferTarget::Vertex, bytemuck::cast_slice(self.data));

        // the index binding is captured by the vertex array
        ctx.bind_buffer(BufferTarget::Index, ebo);
        ctx.buffer_data_static(BufferTarget::Index, bytemuck::cast_slice(self.indices));

        ctx.bind_vertex_array(0);

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            vertices,
            indices: self.indices.len(),
            stride: total_len * FLOAT_SIZE,
            layout,
        })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
    #[error("Geometry needs at least one index")]
    NoIndices,
    #[error("Index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u16, vertices: usize },
    #[error("Shader program has no input named `{0}`")]
    MissingAttribute(String),
}

#[derive(Debug, Copy, Clone)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

/// Where one attribute sits inside an interleaved vertex record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    pub name: String,
    pub components: usize,
    /// Byte offset from the start of the record.
    pub offset: usize,
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: u32,
    vertices: usize,
    indices: usize,
    stride: usize,
    layout: Vec<AttributeLayout>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn index_count(&self) -> usize {
        self.indices
    }

    /// Record size in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attributes(&self) -> &[AttributeLayout] {
        &self.layout
    }

    /// Points every attribute at the program input of the same name.
    pub fn bind_attributes<C: GraphicsContext>(
        &self,
        ctx: &mut C,
        program: &Program,
    ) -> Result<(), GBError> {
        ctx.bind_vertex_array(self.vao);
        ctx.bind_buffer(BufferTarget::Vertex, self.vbo);

        for attr in &self.layout {
            let Some(location) = program.attrib_location(ctx, &attr.name) else {
                ctx.bind_vertex_array(0);
                return Err(GBError::MissingAttribute(attr.name.clone()));
            };

            ctx.vertex_attrib_pointer(
                location,
                attr.components as i32,
                self.stride as i32,
                attr.offset,
            );
            ctx.enable_vertex_attrib_array(location);
        }

        ctx.bind_vertex_array(0);

        Ok(())
    }

    pub fn delete<C: GraphicsContext>(self, ctx: &mut C) {
        ctx.delete_buffer(self.vbo);
        ctx.delete_buffer(self.ebo);
        ctx.delete_vertex_array(self.vao);
    }
}
