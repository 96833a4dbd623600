use crate::chain::{Capability, StructChain, StructKind, VK_FALSE, VK_TRUE};
use crate::config::DeviceCreateFlags;
use crate::errors::{ProfileError, ProfileResult};
use log::{debug, trace};
use vulkanalia::vk;

/// # Features Chain
/// Every registered feature structure, plus the chain that will be handed to `vkCreateDevice`.
///
/// # Details
/// `master` starts with one default record of each registered feature type.
/// [`FeaturesChain::extract_subset`] moves the records a profile needs from `master` to the
/// tail of `required`, which always starts with its own `VkPhysicalDeviceFeatures2`.
/// Caller flags are OR-merged flag by flag so the robustness opt-outs can still clear
/// individual flags afterwards.
#[derive(Debug, Clone)]
pub struct FeaturesChain {
    master: StructChain,
    required: StructChain,
}

impl FeaturesChain {
    pub fn new() -> ProfileResult<Self> {
        let tags = Capability::registered(StructKind::Feature);
        Ok(Self {
            master: StructChain::from_tags(vk::StructureType::PHYSICAL_DEVICE_FEATURES_2, &tags)?,
            required: StructChain::with_head(vk::StructureType::PHYSICAL_DEVICE_FEATURES_2)?,
        })
    }

    /// Moves the listed structures into the required chain, in the given order.
    ///
    /// `VkPhysicalDeviceFeatures2` is skipped since the required chain already starts with
    /// one; tags that are not in the master chain (unregistered, or moved already) are ignored.
    pub fn extract_subset(&mut self, tags: &[vk::StructureType]) {
        for &tag in tags {
            if tag == vk::StructureType::PHYSICAL_DEVICE_FEATURES_2 {
                continue;
            }
            match self.master.extract(tag) {
                Some(record) => {
                    trace!("Requiring {:?}", tag);
                    self.required.push(record);
                }
                None => trace!("{:?} is not available in the master chain", tag),
            }
        }
    }

    /// OR-merges every flag of `requested` into the same-typed record of the required chain.
    ///
    /// # Errors
    /// [`ProfileError::UnregisteredStructure`] when `requested` holds a structure with no
    /// registered flag count. Nothing is merged in that case.
    pub fn merge_requested(&mut self, requested: &StructChain) -> ProfileResult<()> {
        if let Some(unknown) = requested
            .iter()
            .map(Capability::tag)
            .find(|&tag| Capability::flag_count(tag).is_none())
        {
            return Err(ProfileError::UnregisteredStructure(unknown));
        }

        for input in requested.iter() {
            let tag = input.tag();
            if self.required.find(tag).is_none() {
                let record = match self.master.extract(tag) {
                    Some(record) => record,
                    None => Capability::with_tag(tag).ok_or(ProfileError::UnregisteredStructure(tag))?,
                };
                debug!("Merging {:?} outside of the profile subset", tag);
                self.required.push(record);
            }
            let Some(output) = self.required.find_mut(tag) else {
                continue;
            };
            for (out, &flag) in output.flags_mut().iter_mut().zip(input.flags()) {
                *out = if *out == VK_TRUE || flag == VK_TRUE { VK_TRUE } else { VK_FALSE };
            }
        }
        Ok(())
    }

    /// Clears the robustness flags selected by `flags` wherever they appear in the required chain.
    pub fn apply_robustness(&mut self, flags: DeviceCreateFlags) {
        let buffer = flags.contains(DeviceCreateFlags::DISABLE_ROBUST_BUFFER_ACCESS);
        let image = flags.contains(DeviceCreateFlags::DISABLE_ROBUST_IMAGE_ACCESS);

        if buffer {
            if let Some(features2) = self.required.get_mut::<vk::PhysicalDeviceFeatures2>() {
                features2.features.robust_buffer_access = VK_FALSE;
            }
        }
        if let Some(robustness2) = self.required.get_mut::<vk::PhysicalDeviceRobustness2FeaturesEXT>() {
            if buffer {
                robustness2.robust_buffer_access2 = VK_FALSE;
            }
            if image {
                robustness2.robust_image_access2 = VK_FALSE;
            }
        }
        if image {
            if let Some(image_robustness) =
                self.required.get_mut::<vk::PhysicalDeviceImageRobustnessFeatures>()
            {
                image_robustness.robust_image_access = VK_FALSE;
            }
            if let Some(vulkan13) = self.required.get_mut::<vk::PhysicalDeviceVulkan13Features>() {
                vulkan13.robust_image_access = VK_FALSE;
            }
        }
    }

    pub fn required(&self) -> &StructChain {
        &self.required
    }

    pub fn required_mut(&mut self) -> &mut StructChain {
        &mut self.required
    }

    pub fn into_required(self) -> StructChain {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn requested_timeline() -> StructChain {
        let mut chain = StructChain::of(vk::PhysicalDeviceFeatures2::default());
        chain.head_mut().flags_mut()[1] = VK_TRUE; // fullDrawIndexUint32
        let mut timeline = vk::PhysicalDeviceTimelineSemaphoreFeatures::default();
        timeline.timeline_semaphore = VK_TRUE;
        chain.push(Capability::TimelineSemaphore(timeline));
        chain
    }

    fn requested_sync2() -> StructChain {
        let mut chain = StructChain::of(vk::PhysicalDeviceFeatures2::default());
        chain.head_mut().flags_mut()[0] = VK_TRUE; // robustBufferAccess
        let mut sync2 = vk::PhysicalDeviceSynchronization2Features::default();
        sync2.synchronization2 = VK_TRUE;
        chain.push(Capability::Synchronization2(sync2));
        chain
    }

    fn flags_of(chain: &StructChain) -> Vec<(vk::StructureType, Vec<vk::Bool32>)> {
        chain.iter().map(|r| (r.tag(), r.flags().to_vec())).collect()
    }

    #[test]
    fn subset_keeps_the_requested_order() {
        let mut chain = FeaturesChain::new().unwrap();
        chain.extract_subset(&[
            vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
            vk::StructureType::PHYSICAL_DEVICE_FEATURES_2,
            vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES,
        ]);
        assert_eq!(
            chain.required().collect_tags(),
            vec![
                vk::StructureType::PHYSICAL_DEVICE_FEATURES_2,
                vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
                vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES,
            ]
        );
    }

    #[test]
    fn empty_or_sentinel_subset_is_empty() {
        let mut chain = FeaturesChain::new().unwrap();
        chain.extract_subset(&[]);
        assert_eq!(chain.required().len(), 1);
        chain.extract_subset(&[vk::StructureType::PHYSICAL_DEVICE_FEATURES_2]);
        assert_eq!(chain.required().len(), 1);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut once = FeaturesChain::new().unwrap();
        once.merge_requested(&requested_timeline()).unwrap();
        let mut twice = FeaturesChain::new().unwrap();
        twice.merge_requested(&requested_timeline()).unwrap();
        twice.merge_requested(&requested_timeline()).unwrap();
        assert_eq!(flags_of(once.required()), flags_of(twice.required()));
    }

    #[test]
    fn merge_is_commutative() {
        let mut ab = FeaturesChain::new().unwrap();
        ab.merge_requested(&requested_timeline()).unwrap();
        ab.merge_requested(&requested_sync2()).unwrap();
        let mut ba = FeaturesChain::new().unwrap();
        ba.merge_requested(&requested_sync2()).unwrap();
        ba.merge_requested(&requested_timeline()).unwrap();

        let mut left = flags_of(ab.required());
        let mut right = flags_of(ba.required());
        left.sort_by_key(|(tag, _)| tag.as_raw());
        right.sort_by_key(|(tag, _)| tag.as_raw());
        assert_eq!(left, right);

        let head = ab.required().get::<vk::PhysicalDeviceFeatures2>().unwrap();
        assert_eq!(head.features.robust_buffer_access, VK_TRUE);
        assert_eq!(head.features.full_draw_index_uint32, VK_TRUE);
    }

    #[test]
    fn structures_without_flag_layout_fail_fast() {
        let mut requested = requested_timeline();
        requested.push(Capability::Properties2(vk::PhysicalDeviceProperties2::default()));
        let mut chain = FeaturesChain::new().unwrap();
        let err = chain.merge_requested(&requested).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::UnregisteredStructure(vk::StructureType::PHYSICAL_DEVICE_PROPERTIES_2)
        ));
        assert_eq!(chain.required().len(), 1);
    }

    #[test]
    fn robustness_overrides_clear_every_alias() {
        let mut requested = StructChain::of(vk::PhysicalDeviceFeatures2::default());
        requested.head_mut().flags_mut()[0] = VK_TRUE;
        for tag in [
            crate::chain::capability::ROBUSTNESS_2_FEATURES,
            vk::StructureType::PHYSICAL_DEVICE_IMAGE_ROBUSTNESS_FEATURES,
            vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
        ] {
            let mut record = Capability::with_tag(tag).unwrap();
            record.flags_mut().iter_mut().for_each(|flag| *flag = VK_TRUE);
            requested.push(record);
        }

        let mut chain = FeaturesChain::new().unwrap();
        chain.merge_requested(&requested).unwrap();
        chain.apply_robustness(DeviceCreateFlags::DISABLE_ROBUST_ACCESS);

        let required = chain.required();
        assert_eq!(required.get::<vk::PhysicalDeviceFeatures2>().unwrap().features.robust_buffer_access, VK_FALSE);
        let robustness2 = required.get::<vk::PhysicalDeviceRobustness2FeaturesEXT>().unwrap();
        assert_eq!(robustness2.robust_buffer_access2, VK_FALSE);
        assert_eq!(robustness2.robust_image_access2, VK_FALSE);
        assert_eq!(robustness2.null_descriptor, VK_TRUE);
        assert_eq!(
            required.get::<vk::PhysicalDeviceImageRobustnessFeatures>().unwrap().robust_image_access,
            VK_FALSE
        );
        let vulkan13 = required.get::<vk::PhysicalDeviceVulkan13Features>().unwrap();
        assert_eq!(vulkan13.robust_image_access, VK_FALSE);
        assert_eq!(vulkan13.maintenance4, VK_TRUE);
    }

    #[test]
    fn buffer_opt_out_leaves_image_robustness() {
        let mut requested = StructChain::of(vk::PhysicalDeviceFeatures2::default());
        let mut image = vk::PhysicalDeviceImageRobustnessFeatures::default();
        image.robust_image_access = VK_TRUE;
        requested.push(Capability::ImageRobustness(image));

        let mut chain = FeaturesChain::new().unwrap();
        chain.merge_requested(&requested).unwrap();
        chain.apply_robustness(DeviceCreateFlags::DISABLE_ROBUST_BUFFER_ACCESS);
        assert_eq!(
            chain.required().get::<vk::PhysicalDeviceImageRobustnessFeatures>().unwrap().robust_image_access,
            VK_TRUE
        );
    }
}
