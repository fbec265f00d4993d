//! Canvas2D frame drawing
//!
//! Pure presentation: reads session + world state each animation frame and
//! repaints. No game logic lives here.

use web_sys::CanvasRenderingContext2d;

use crate::consts::GROUND_THICKNESS;
use crate::sim::Session;
use crate::world::PhysicsWorld;

const BACKGROUND: &str = "#0e1116";
const GROUND_FILL: &str = "#2c3e50";
const SLING_POST: &str = "#7a5230";
const TETHER_STROKE: &str = "#c9a227";
const PROJECTILE_FILL: &str = "#d64550";
const BLOCK_STROKE: &str = "#10131a";

/// Repaint the whole frame
pub fn draw(ctx: &CanvasRenderingContext2d, session: &Session, world: &dyn PhysicsWorld) {
    let p = &session.profile;
    let w = p.viewport_width as f64;
    let h = p.viewport_height as f64;

    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    // Ground strip
    let ground = world.position(session.ground);
    ctx.set_fill_style_str(GROUND_FILL);
    ctx.fill_rect(
        0.0,
        (ground.y - GROUND_THICKNESS / 2.0) as f64,
        p.ground_width as f64,
        GROUND_THICKNESS as f64,
    );

    draw_sling(ctx, session, world);
    draw_blocks(ctx, session, world);
    draw_projectile(ctx, session, world);
}

fn draw_sling(ctx: &CanvasRenderingContext2d, session: &Session, world: &dyn PhysicsWorld) {
    let anchor = session.profile.anchor;
    let post_w = 8.0 * session.profile.scale as f64;

    // Post from anchor down to the ground
    ctx.set_fill_style_str(SLING_POST);
    ctx.fill_rect(
        anchor.x as f64 - post_w / 2.0,
        anchor.y as f64,
        post_w,
        (session.profile.ground_top() - anchor.y) as f64,
    );

    // Tether band, only while one exists
    if session.tether.is_some() {
        if let Some(projectile) = session.projectile {
            let pos = world.position(projectile);
            ctx.set_stroke_style_str(TETHER_STROKE);
            ctx.set_line_width((3.0 * session.profile.scale) as f64);
            ctx.begin_path();
            ctx.move_to(anchor.x as f64, anchor.y as f64);
            ctx.line_to(pos.x as f64, pos.y as f64);
            ctx.stroke();
        }
    }
}

fn draw_projectile(ctx: &CanvasRenderingContext2d, session: &Session, world: &dyn PhysicsWorld) {
    let Some(projectile) = session.projectile else {
        return;
    };
    let pos = world.position(projectile);
    ctx.set_fill_style_str(PROJECTILE_FILL);
    ctx.begin_path();
    let _ = ctx.arc(
        pos.x as f64,
        pos.y as f64,
        session.profile.projectile_radius() as f64,
        0.0,
        std::f64::consts::TAU,
    );
    ctx.fill();
}

fn draw_blocks(ctx: &CanvasRenderingContext2d, session: &Session, world: &dyn PhysicsWorld) {
    for entity in &session.formation {
        let pos = world.position(entity.body);
        let angle = world.rotation(entity.body);
        let half = entity.spec.half_extents;

        ctx.save();
        let _ = ctx.translate(pos.x as f64, pos.y as f64);
        let _ = ctx.rotate(angle as f64);
        ctx.set_fill_style_str(entity.spec.color.as_css());
        ctx.fill_rect(
            -half.x as f64,
            -half.y as f64,
            (half.x * 2.0) as f64,
            (half.y * 2.0) as f64,
        );
        ctx.set_stroke_style_str(BLOCK_STROKE);
        ctx.set_line_width(1.5);
        ctx.stroke_rect(
            -half.x as f64,
            -half.y as f64,
            (half.x * 2.0) as f64,
            (half.y * 2.0) as f64,
        );
        ctx.restore();
    }
}
