/// Shared bindings: camera globals and the equirectangular environment map.
const GLOBALS: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    // xyz: camera position, w: 1.0 once an environment map is installed.
    eye: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
@group(0) @binding(1)
var env_map: texture_2d<f32>;
@group(0) @binding(2)
var env_sampler: sampler;

const PI: f32 = 3.14159265;

fn equirect_uv(dir: vec3<f32>) -> vec2<f32> {
    let d = normalize(dir);
    let u = atan2(d.z, d.x) / (2.0 * PI) + 0.5;
    let v = acos(clamp(d.y, -1.0, 1.0)) / PI;
    return vec2<f32>(u, v);
}

fn fallback_sky(dir: vec3<f32>) -> vec3<f32> {
    let t = clamp(normalize(dir).y * 0.5 + 0.5, 0.0, 1.0);
    return mix(vec3<f32>(0.05, 0.05, 0.08), vec3<f32>(0.35, 0.45, 0.6), t);
}

fn sample_env(dir: vec3<f32>) -> vec3<f32> {
    if globals.eye.w < 0.5 {
        return fallback_sky(dir);
    }
    return textureSampleLevel(env_map, env_sampler, equirect_uv(dir), 0.0).rgb;
}
"#;

const BACKGROUND_BODY: &str = r#"
struct BackgroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_background(@builtin(vertex_index) index: u32) -> BackgroundOutput {
    // One triangle covering the screen.
    let x = f32((index << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(index & 2u) * 2.0 - 1.0;
    var out: BackgroundOutput;
    out.clip_position = vec4<f32>(x, y, 1.0, 1.0);
    out.ndc = vec2<f32>(x, y);
    return out;
}

@fragment
fn fs_background(in: BackgroundOutput) -> @location(0) vec4<f32> {
    let far = globals.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let dir = far.xyz / far.w - globals.eye.xyz;
    return vec4<f32>(sample_env(dir), 1.0);
}
"#;

const MESH_BODY: &str = r#"
struct Material {
    // 0: physical, 1: normal, 2: matcap
    mode: u32,
    transparent: u32,
    _pad0: u32,
    _pad1: u32,
    // metalness, roughness, iridescence, iridescence_ior
    surface: vec4<f32>,
    // thickness range min, max, transmission, ior
    optics: vec4<f32>,
    // thickness, has matcap texture, unused, unused
    extra: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> material: Material;
@group(1) @binding(1)
var matcap_tex: texture_2d<f32>;
@group(1) @binding(2)
var matcap_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_mesh(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = globals.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    return out;
}

fn schlick(f0: vec3<f32>, cos_theta: f32) -> vec3<f32> {
    return f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - cos_theta, 5.0);
}

// Thin-film interference tint for a film of `thickness_nm` and index `film_ior`.
fn thin_film(thickness_nm: f32, film_ior: f32, cos_theta: f32) -> vec3<f32> {
    let sin2 = (1.0 - cos_theta * cos_theta) / (film_ior * film_ior);
    let cos_t = sqrt(max(1.0 - sin2, 0.0));
    let opd = 2.0 * film_ior * thickness_nm * cos_t;
    let wavelengths = vec3<f32>(650.0, 510.0, 475.0);
    return vec3<f32>(0.5) + 0.5 * cos(2.0 * PI * opd / wavelengths);
}

fn shade_physical(n_in: vec3<f32>, world_position: vec3<f32>, front: bool) -> vec4<f32> {
    let v = normalize(globals.eye.xyz - world_position);
    var n = normalize(n_in);
    if !front {
        n = -n;
    }
    let n_dot_v = clamp(dot(n, v), 0.0, 1.0);

    let metalness = material.surface.x;
    let roughness = material.surface.y;
    let iridescence = material.surface.z;
    let iridescence_ior = material.surface.w;
    let transmission = material.optics.z;
    let ior = max(material.optics.w, 1.0);
    let thickness = material.extra.x;

    let r = (ior - 1.0) / (ior + 1.0);
    let f0 = mix(vec3<f32>(r * r), vec3<f32>(0.9), metalness);
    var fresnel = schlick(f0, n_dot_v);

    let film = mix(material.optics.x, material.optics.y, 1.0 - n_dot_v);
    let tint = thin_film(film, iridescence_ior, n_dot_v);
    fresnel = mix(fresnel, fresnel * tint * 2.0, iridescence);

    let reflected = sample_env(reflect(-v, n));
    let diffuse_env = sample_env(n);
    let specular = mix(reflected, diffuse_env, roughness);

    let refracted_dir = refract(-v, n, 1.0 / ior);
    let absorb = mix(1.0, 0.8, clamp(thickness / 10.0, 0.0, 1.0));
    let transmitted = sample_env(refracted_dir) * absorb;
    let body = mix(diffuse_env * (1.0 - metalness) * 0.5, transmitted, transmission);

    let color = body * (vec3<f32>(1.0) - fresnel) + specular * fresnel;
    var alpha = 1.0;
    if material.transparent != 0u {
        let f = clamp(max(fresnel.r, max(fresnel.g, fresnel.b)), 0.0, 1.0);
        alpha = mix(1.0, 0.2 + 0.8 * f, transmission);
    }
    return vec4<f32>(color, alpha);
}

@fragment
fn fs_mesh(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var view_normal = normalize((globals.view * vec4<f32>(normalize(in.world_normal), 0.0)).xyz);
    if !front {
        view_normal = -view_normal;
    }
    if material.mode == 1u {
        return vec4<f32>(view_normal * 0.5 + vec3<f32>(0.5), 1.0);
    }
    if material.mode == 2u {
        let uv = vec2<f32>(view_normal.x, -view_normal.y) * 0.495 + vec2<f32>(0.5);
        let texel = textureSample(matcap_tex, matcap_sampler, uv);
        if material.extra.y < 0.5 {
            return vec4<f32>(vec3<f32>(0.8), 1.0);
        }
        return vec4<f32>(texel.rgb, 1.0);
    }
    return shade_physical(in.world_normal, in.world_position, front);
}
"#;

/// Fullscreen environment background.
pub fn background_shader() -> String {
    format!("{GLOBALS}{BACKGROUND_BODY}")
}

/// Text and bubble meshes.
pub fn mesh_shader() -> String {
    format!("{GLOBALS}{MESH_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_share_globals() {
        for src in [background_shader(), mesh_shader()] {
            assert!(src.contains("var<uniform> globals"));
            assert!(src.contains("fn sample_env"));
        }
        assert!(mesh_shader().contains("fn vs_mesh"));
        assert!(background_shader().contains("fn fs_background"));
    }
}
