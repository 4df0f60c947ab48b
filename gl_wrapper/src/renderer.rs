use crate::context::GraphicsContext;
use crate::geometry::Geometry;
use crate::program::Program;

#[derive(Default)]
pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    /// Makes `program` current unless it already is.
    pub fn use_program<C: GraphicsContext>(&mut self, ctx: &mut C, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            ctx.use_program(p_id);
            self.current_program = p_id;
        }
    }

    /// Draws every index of `geometry` as a triangle list.
    pub fn draw_indexed<C: GraphicsContext>(
        &mut self,
        ctx: &mut C,
        geometry: &Geometry,
        program: &Program,
    ) {
        self.use_program(ctx, program);

        ctx.bind_vertex_array(geometry.vao());
        ctx.draw_elements_u16(geometry.index_count() as i32);
    }

    pub fn clear_color<C: GraphicsContext>(&self, ctx: &mut C, r: f32, g: f32, b: f32) {
        ctx.clear(r, g, b, 1.0);
    }
}
