/// Vertex shader for the morphing foliage.
///
/// Must stay in step with `particles::foliage::morph_position`.
pub const FOLIAGE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_target;
layout(location = 1) in vec3 a_scatter;
layout(location = 2) in float a_random;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform float u_progress;

float ease(float t) {
    t = clamp(t, 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

void main() {
    float t = ease(u_progress);
    vec3 pos = mix(a_scatter, a_target, t);

    // Breathing once nearly assembled
    if (t > 0.8) {
        float breathe = sin(u_time * 2.0 + pos.y * 2.0) * 0.02;
        pos.x += breathe * pos.x;
        pos.z += breathe * pos.z;
    }

    // Turbulence fading out toward the tree
    if (t < 1.0) {
        pos.y += sin(u_time * 0.5 + a_random * 10.0) * 0.5 * (1.0 - t);
        pos.x += cos(u_time * 0.3 + a_random * 5.0) * 0.2 * (1.0 - t);
    }

    vec4 view_pos = u_view * u_model * vec4(pos, 1.0);
    gl_PointSize = 25.0 * (1.0 + t * 0.5) / max(-view_pos.z, 0.0001);
    gl_Position = u_projection * view_pos;
}
"#;

/// Soft round foliage sprite
pub const FOLIAGE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec3 u_color;
uniform float u_alpha;

out vec4 fragColor;

void main() {
    vec2 xy = gl_PointCoord - vec2(0.5);
    float r = length(xy);
    if (r > 0.5) {
        discard;
    }

    float strength = 1.0 - r * 2.0;
    strength = strength * strength;

    fragColor = vec4(u_color, strength * u_alpha);
}
"#;

/// Vertex shader for instanced ornaments and the topper.
/// The per-instance transform occupies locations 2..5.
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in mat4 a_instance;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;

void main() {
    mat4 world = u_model * a_instance;
    vec4 world_pos = world * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = mat3(world) * a_normal;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Metallic ornament shading: ambient, a soft key spot, a cool fill, the
/// optional star light and a cheap studio reflection
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;

uniform vec3 u_camera_pos;
uniform vec3 u_color;
uniform vec3 u_emissive;
uniform float u_metalness;
uniform float u_roughness;

uniform float u_ambient;

uniform vec3 u_key_position;
uniform vec3 u_key_color;
uniform float u_key_intensity;
uniform float u_key_cos_outer;
uniform float u_key_cos_inner;

uniform vec3 u_fill_position;
uniform vec3 u_fill_color;
uniform float u_fill_intensity;

uniform vec3 u_star_position;
uniform vec3 u_star_color;
uniform float u_star_intensity;
uniform float u_star_distance;
uniform float u_star_decay;

out vec4 fragColor;

vec3 shade(vec3 n, vec3 v, vec3 l, vec3 radiance, vec3 albedo) {
    vec3 h = normalize(l + v);
    float ndotl = max(dot(n, l), 0.0);
    float shininess = mix(256.0, 4.0, u_roughness);
    float spec = pow(max(dot(n, h), 0.0), shininess) * (shininess + 8.0) / 25.0;

    vec3 f0 = mix(vec3(0.04), albedo, u_metalness);
    vec3 diffuse = albedo * (1.0 - u_metalness);
    return (diffuse + f0 * spec) * radiance * ndotl;
}

float distance_falloff(float d, float range, float decay) {
    float falloff = 1.0 / max(pow(d, decay), 0.01);
    if (range > 0.0) {
        float cutoff = clamp(1.0 - pow(d / range, 4.0), 0.0, 1.0);
        falloff *= cutoff * cutoff;
    }
    return falloff;
}

void main() {
    vec3 n = normalize(v_normal);
    vec3 v = normalize(u_camera_pos - v_world_position);

    vec3 color = u_color * u_ambient;

    // Key spot, aimed at the origin
    vec3 to_key = u_key_position - v_world_position;
    vec3 l = normalize(to_key);
    vec3 spot_dir = normalize(-u_key_position);
    float cone = smoothstep(u_key_cos_outer, u_key_cos_inner, dot(-l, spot_dir));
    color += shade(n, v, l, u_key_color * u_key_intensity * cone, u_color);

    // Fill from below
    vec3 to_fill = u_fill_position - v_world_position;
    float fill_falloff = distance_falloff(length(to_fill), 0.0, 2.0) * 100.0;
    color += shade(n, v, normalize(to_fill), u_fill_color * u_fill_intensity * min(fill_falloff, 1.0), u_color);

    // Star light, zero intensity when off
    vec3 to_star = u_star_position - v_world_position;
    float star_falloff = distance_falloff(length(to_star), u_star_distance, u_star_decay);
    color += shade(n, v, normalize(to_star), u_star_color * u_star_intensity * star_falloff, u_color);

    // Reflection of a bright horizon and dark floor
    vec3 r = reflect(-v, n);
    vec3 env = mix(vec3(0.05, 0.05, 0.06), vec3(0.9, 0.85, 0.8), smoothstep(-0.2, 0.6, r.y));
    vec3 f0 = mix(vec3(0.04), u_color, u_metalness);
    color += env * f0 * (1.0 - u_roughness) * 0.6;

    color += u_emissive;

    fragColor = vec4(color, 1.0);
}
"#;

/// Vertex shader for sparkles and stars.
/// Layout: position(3) + size(1) + alpha(1) + color(3)
pub const PARTICLE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size_scale;

out float v_alpha;
out vec3 v_color;

void main() {
    v_alpha = a_alpha;
    v_color = a_color;

    vec4 view_pos = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * (u_size_scale / max(-view_pos.z, 0.0001));
}
"#;

pub const PARTICLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

uniform bool u_fade;

out vec4 fragColor;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float alpha = v_alpha;
    if (u_fade) {
        float falloff = 1.0 - dist * 2.0;
        alpha *= falloff * falloff;
    }

    fragColor = vec4(v_color, alpha);
}
"#;

/// Fullscreen triangle for post-processing
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    float x = float((gl_VertexID & 1) << 2);
    float y = float((gl_VertexID & 2) << 1);
    v_uv = vec2(x * 0.5, y * 0.5);
    gl_Position = vec4(x - 1.0, y - 1.0, 0.0, 1.0);
}
"#;

/// Keeps only what is brighter than the luminance threshold
pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float luminance = dot(color, vec3(0.2126, 0.7152, 0.0722));
    float weight = smoothstep(u_threshold, u_threshold + 0.1, luminance);
    fragColor = vec4(color * weight, 1.0);
}
"#;

/// Separable gaussian, `u_radius` stretches the taps
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;
uniform float u_radius;

out vec4 fragColor;

void main() {
    vec2 texel = 1.0 / vec2(textureSize(u_texture, 0));
    float weights[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);

    vec3 result = texture(u_texture, v_uv).rgb * weights[0];
    for (int i = 1; i < 5; i++) {
        vec2 offset = u_direction * texel * float(i) * (1.0 + u_radius * 4.0);
        result += texture(u_texture, v_uv + offset).rgb * weights[i];
        result += texture(u_texture, v_uv - offset).rgb * weights[i];
    }

    fragColor = vec4(result, 1.0);
}
"#;

/// Bloom add, exposure + ACES tone mapping, film grain, vignette
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_exposure;
uniform float u_noise;
uniform float u_time;
uniform float u_vignette_offset;
uniform float u_vignette_darkness;

out vec4 fragColor;

vec3 aces(vec3 x) {
    return clamp((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14), 0.0, 1.0);
}

float grain(vec2 uv, float t) {
    return fract(sin(dot(uv + fract(t), vec2(12.9898, 78.233))) * 43758.5453);
}

void main() {
    vec3 color = texture(u_scene, v_uv).rgb + texture(u_bloom, v_uv).rgb * u_bloom_strength;

    color = aces(color * u_exposure);
    color = pow(color, vec3(1.0 / 2.2));

    color += (grain(v_uv, u_time) - 0.5) * u_noise;

    float d = distance(v_uv, vec2(0.5));
    color *= smoothstep(0.8, u_vignette_offset * 0.799, d * (u_vignette_darkness + u_vignette_offset));

    fragColor = vec4(color, 1.0);
}
"#;
