//! Cg clip-ray shader fragments

use super::template::{DispatcherTemplate, InstanceTemplate, Piece};

/// Dispatcher wrapping the per-instance clip calls
pub const DISPATCHER: DispatcherTemplate = DispatcherTemplate::new(
    "\
// Performs an clip operation on the given ray
// -> Shortens the ray on both ends, may invalidate it entirely
void ClipRay(inout float3 RayOrigin, float3 RayDirection, inout float MaximumTravelLength, float2 FragmentCoordinate)
{
",
    "}\n",
);

/// Per-plane clip function, one instance per active clip plane
pub const CLIP_PLANE_BODY: InstanceTemplate = InstanceTemplate::new(&[
    Piece::Text("// Clip plane in Hesse normal form, view space\nuniform float4 ClipPlane"),
    Piece::InstanceIndex,
    Piece::Text(
        ";
void ClipRayPlane",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        "(inout float3 RayOrigin, float3 RayDirection, inout float MaximumTravelLength)
{
	float distanceOrigin = dot(ClipPlane",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        ".xyz, RayOrigin) + ClipPlane",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        ".w;
	float cosAngle = dot(ClipPlane",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        ".xyz, RayDirection);
	if (abs(cosAngle) < 0.0001) {
		// Ray is parallel to the plane: keep it only when on the visible side
		if (distanceOrigin < 0.0)
			MaximumTravelLength = -1.0;
	} else {
		float hitDistance = -distanceOrigin / cosAngle;
		if (cosAngle > 0.0) {
			// Entering the visible half-space
			if (hitDistance > 0.0) {
				RayOrigin += RayDirection * hitDistance;
				MaximumTravelLength -= hitDistance;
			}
		} else {
			// Leaving the visible half-space
			if (hitDistance < 0.0)
				MaximumTravelLength = -1.0;
			else if (hitDistance < MaximumTravelLength)
				MaximumTravelLength = hitDistance;
		}
	}
}
",
    ),
]);

/// Call statement of one clip-plane instance inside the dispatcher
pub const CLIP_PLANE_CALL: InstanceTemplate = InstanceTemplate::new(&[
    Piece::Text("\tClipRayPlane"),
    Piece::InstanceIndex,
    Piece::Text("(RayOrigin, RayDirection, MaximumTravelLength);"),
]);

/// Per-depth-texture clip function
pub const DEPTH_TEXTURE_BODY: InstanceTemplate = InstanceTemplate::new(&[
    Piece::Text("uniform sampler2D DepthTexture"),
    Piece::InstanceIndex,
    Piece::Text(
        ";
uniform float2 WindowSize",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        ";
void ClipRayDepthTexture",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        "(inout float3 RayOrigin, float3 RayDirection, inout float MaximumTravelLength, float2 FragmentCoordinate)
{
	float2 texCoord = FragmentCoordinate / WindowSize",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        ";
	float sceneDepth = tex2D(DepthTexture",
    ),
    Piece::InstanceIndex,
    Piece::Text(
        ", texCoord).r;
	// Never travel past the opaque scene geometry
	if (sceneDepth < MaximumTravelLength)
		MaximumTravelLength = sceneDepth;
}
",
    ),
]);

/// Call statement of one depth-texture instance inside the dispatcher
pub const DEPTH_TEXTURE_CALL: InstanceTemplate = InstanceTemplate::new(&[
    Piece::Text("\tClipRayDepthTexture"),
    Piece::InstanceIndex,
    Piece::Text("(RayOrigin, RayDirection, MaximumTravelLength, FragmentCoordinate);"),
]);
